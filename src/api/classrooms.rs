use crate::api::client::ApiClient;
use crate::api::errors::ClientError;
use crate::schemas::classroom::{
    Classroom, ClassroomCreate, ClassroomDetail, ClassroomJoin, ClassroomList,
};

impl ApiClient {
    pub(crate) async fn classrooms(&self) -> Result<Vec<Classroom>, ClientError> {
        let list: ClassroomList = self.get_json(&["classrooms"]).await?;
        Ok(list.classrooms)
    }

    pub(crate) async fn classroom(
        &self,
        classroom_id: &str,
    ) -> Result<ClassroomDetail, ClientError> {
        self.get_json(&["classroom", classroom_id]).await
    }

    pub(crate) async fn create_classroom(
        &self,
        request: &ClassroomCreate,
    ) -> Result<(), ClientError> {
        self.post_json(&["classroom"], request).await
    }

    pub(crate) async fn join_classroom(&self, request: &ClassroomJoin) -> Result<(), ClientError> {
        self.post_json(&["classroom", "join"], request).await
    }
}
