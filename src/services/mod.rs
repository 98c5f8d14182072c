pub(crate) mod answer_code;
pub(crate) mod classroom_view;
pub(crate) mod forms;
pub(crate) mod navigation;
pub(crate) mod quiz_form;
pub(crate) mod quiz_session;
pub(crate) mod review;
pub(crate) mod scoring;

/// What a successful write invalidated; callers re-fetch just that.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Refresh {
    User,
    Classrooms,
    Classroom(String),
}
