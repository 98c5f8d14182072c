use std::fmt;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use validator::Validate;

use crate::core::time::{deserialize_optional_timestamp, deserialize_timestamp};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Role {
    Teacher,
    Student,
}

impl Role {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Teacher => "teacher",
            Self::Student => "student",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Teacher {
    #[serde(default)]
    pub(crate) first_name: Option<String>,
    #[serde(default)]
    pub(crate) last_name: Option<String>,
    #[serde(default)]
    pub(crate) pronouns: Option<String>,
}

impl Teacher {
    /// "Ms Lovelace" when pronouns are set, otherwise the full name.
    pub(crate) fn salutation(&self) -> String {
        let last = self.last_name.as_deref().unwrap_or_default();
        match self.pronouns.as_deref().filter(|value| !value.trim().is_empty()) {
            Some(pronouns) if !last.is_empty() => format!("{pronouns} {last}"),
            _ => [self.first_name.as_deref(), self.last_name.as_deref()]
                .into_iter()
                .flatten()
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

/// Entry of `GET /classrooms`: a membership seen from the viewer's side.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Classroom {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) role: Role,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub(crate) joined_at: Option<OffsetDateTime>,
    pub(crate) teacher: Teacher,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ClassroomList {
    #[serde(default)]
    pub(crate) classrooms: Vec<Classroom>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ClassroomInfo {
    pub(crate) id: String,
    pub(crate) name: String,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub(crate) created_at: Option<OffsetDateTime>,
    pub(crate) teacher: Teacher,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Member {
    pub(crate) user_id: String,
    pub(crate) role: Role,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub(crate) joined_at: Option<OffsetDateTime>,
    #[serde(default)]
    pub(crate) first_name: Option<String>,
    #[serde(default)]
    pub(crate) last_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct QuizSummary {
    pub(crate) id: String,
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) is_completed: bool,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub(crate) created_at: OffsetDateTime,
}

/// Payload of `GET /classroom/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ClassroomDetail {
    pub(crate) classroom: ClassroomInfo,
    #[serde(default)]
    pub(crate) quizzes: Vec<QuizSummary>,
    #[serde(default)]
    pub(crate) members: Vec<Member>,
    pub(crate) your_role: Role,
}

#[derive(Debug, Clone, Serialize, Validate)]
pub(crate) struct ClassroomCreate {
    #[validate(length(min = 4, message = "Name must be at least 4 characters."))]
    pub(crate) name: String,
}

#[derive(Debug, Clone, Serialize, Validate)]
pub(crate) struct ClassroomJoin {
    #[validate(length(min = 4, message = "Classroom id must be at least 4 characters."))]
    pub(crate) classroom_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn classroom_detail_parses_backend_payload() {
        let detail: ClassroomDetail = serde_json::from_value(json!({
            "status": "success",
            "classroom": {
                "id": "c-1",
                "name": "Chemistry 101",
                "created_at": "2025-09-01T08:00:00+00:00",
                "teacher": {
                    "id": "t-1",
                    "first_name": "Ada",
                    "last_name": "Lovelace",
                    "image_url": null,
                    "pronouns": "Ms"
                }
            },
            "quizzes": [{
                "name": "Stoichiometry",
                "is_completed": false,
                "classroom_id": "c-1",
                "id": "q-1",
                "created_at": "2025-10-17T10:00:00.5+00:00"
            }],
            "members": [{
                "user_id": "s-1",
                "role": "student",
                "joined_at": "2025-09-02T08:00:00+00:00",
                "first_name": "Grace",
                "last_name": "Hopper",
                "image_url": null,
                "pronouns": null
            }],
            "your_role": "student"
        }))
        .expect("classroom detail");

        assert_eq!(detail.your_role, Role::Student);
        assert_eq!(detail.quizzes.len(), 1);
        assert_eq!(detail.members[0].role, Role::Student);
        assert_eq!(detail.classroom.teacher.salutation(), "Ms Lovelace");
    }

    #[test]
    fn classroom_list_tolerates_missing_join_time() {
        let list: ClassroomList = serde_json::from_value(json!({
            "status": "success",
            "classrooms": [{
                "id": "c-1",
                "name": "Physics",
                "role": "teacher",
                "joined_at": null,
                "teacher": { "id": "t-1", "first_name": "Ada", "last_name": "Lovelace" }
            }]
        }))
        .expect("classroom list");

        assert_eq!(list.classrooms[0].role, Role::Teacher);
        assert!(list.classrooms[0].joined_at.is_none());
        assert_eq!(list.classrooms[0].teacher.salutation(), "Ada Lovelace");
    }

    #[test]
    fn join_requires_four_characters() {
        let join = ClassroomJoin { classroom_id: "abc".to_string() };
        assert!(join.validate().is_err());
        let join = ClassroomJoin { classroom_id: "abcd".to_string() };
        assert!(join.validate().is_ok());
    }
}
