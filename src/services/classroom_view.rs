use time::{Duration, OffsetDateTime};

use crate::api::client::ApiClient;
use crate::api::resource::Resource;
use crate::core::time::{format_date_caption, is_older_than, window_from_hours};
use crate::schemas::classroom::{ClassroomCreate, ClassroomDetail, ClassroomJoin, QuizSummary, Role};
use crate::services::forms::{self, FormErrors};
use crate::services::navigation::TabState;
use crate::services::Refresh;

/// State of one opened classroom page.
#[derive(Debug)]
pub(crate) struct ClassroomView {
    classroom_id: String,
    detail: Resource<ClassroomDetail>,
    tabs: TabState,
    stale_window: Duration,
}

impl ClassroomView {
    pub(crate) fn new(classroom_id: impl Into<String>, stale_after_hours: u64) -> Self {
        Self {
            classroom_id: classroom_id.into(),
            detail: Resource::Loading,
            tabs: TabState::for_classroom(),
            stale_window: window_from_hours(stale_after_hours),
        }
    }

    pub(crate) fn classroom_id(&self) -> &str {
        &self.classroom_id
    }

    pub(crate) async fn load(&mut self, api: &ApiClient) {
        self.detail = Resource::fetch(api.classroom(&self.classroom_id)).await;
        if let Some(err) = self.detail.error() {
            tracing::warn!(
                classroom_id = %self.classroom_id,
                error = %err,
                "Failed to load classroom"
            );
        }
    }

    /// Re-fetches only when the invalidation concerns this classroom.
    pub(crate) async fn refresh(&mut self, api: &ApiClient, refresh: &Refresh) -> bool {
        match refresh {
            Refresh::Classroom(id) if id == &self.classroom_id => {
                self.load(api).await;
                true
            }
            _ => false,
        }
    }

    pub(crate) fn detail(&self) -> &Resource<ClassroomDetail> {
        &self.detail
    }

    pub(crate) fn tabs(&self) -> &TabState {
        &self.tabs
    }

    pub(crate) fn tabs_mut(&mut self) -> &mut TabState {
        &mut self.tabs
    }

    pub(crate) fn role(&self) -> Option<Role> {
        self.detail.data().map(|detail| detail.your_role)
    }

    /// Student pages render only for students, teacher pages only for teachers.
    pub(crate) fn renders_for(&self, page: Role) -> bool {
        self.role() == Some(page)
    }

    pub(crate) fn new_quizzes(&self) -> Vec<&QuizSummary> {
        self.detail.data().map(|detail| new_quizzes(&detail.quizzes)).unwrap_or_default()
    }

    pub(crate) fn past_quizzes(&self, now: OffsetDateTime) -> Vec<&QuizSummary> {
        self.detail
            .data()
            .map(|detail| past_quizzes(&detail.quizzes, now, self.stale_window))
            .unwrap_or_default()
    }

    pub(crate) fn find_quiz(&self, reference: &str) -> Option<&QuizSummary> {
        let quizzes = &self.detail.data()?.quizzes;
        quizzes
            .iter()
            .find(|quiz| quiz.id == reference)
            .or_else(|| quizzes.iter().find(|quiz| quiz.name.eq_ignore_ascii_case(reference)))
    }
}

pub(crate) fn new_quizzes(quizzes: &[QuizSummary]) -> Vec<&QuizSummary> {
    quizzes.iter().filter(|quiz| !quiz.is_completed).collect()
}

/// Completed quizzes, plus open ones older than the stale window. An old open
/// quiz therefore shows up in both lists.
pub(crate) fn past_quizzes(
    quizzes: &[QuizSummary],
    now: OffsetDateTime,
    stale_window: Duration,
) -> Vec<&QuizSummary> {
    quizzes
        .iter()
        .filter(|quiz| quiz.is_completed || is_older_than(quiz.created_at, now, stale_window))
        .collect()
}

pub(crate) fn quiz_caption(quiz: &QuizSummary) -> String {
    format!("Created on {}", format_date_caption(quiz.created_at))
}

pub(crate) async fn create_classroom(
    api: &ApiClient,
    request: &ClassroomCreate,
) -> Result<Refresh, FormErrors> {
    forms::check(request)?;
    api.create_classroom(request).await.map_err(|err| FormErrors::rejected(&err))?;
    tracing::info!(name = %request.name, "Classroom created");
    Ok(Refresh::Classrooms)
}

pub(crate) async fn join_classroom(
    api: &ApiClient,
    request: &ClassroomJoin,
) -> Result<Refresh, FormErrors> {
    forms::check(request)?;
    api.join_classroom(request).await.map_err(|err| FormErrors::rejected(&err))?;
    tracing::info!(classroom_id = %request.classroom_id, "Joined classroom");
    Ok(Refresh::Classrooms)
}
