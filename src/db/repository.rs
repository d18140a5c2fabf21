//! Repositories for the classroom collections.
//!
//! Each repository owns one collection file and performs linear lookups by key over
//! the freshly loaded collection.

use std::path::PathBuf;

use chrono::Utc;

use super::{read_array, RecordStore};
use crate::errors::AppError;
use crate::models::{Badge, Student, Task, Teacher, UpdateStudentRequest};

// ==================== STUDENTS ====================

/// Student records, keyed by login.
#[derive(Debug)]
pub struct StudentRepository {
    store: RecordStore<Student>,
}

impl StudentRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            store: RecordStore::new(path),
        }
    }

    /// List all students in insertion order.
    pub async fn list_students(&self) -> Result<Vec<Student>, AppError> {
        self.store
            .load()
            .await
            .map_err(AppError::storage("Could not read students data"))
    }

    /// Get a student by login.
    pub async fn get_student(&self, login: &str) -> Result<Student, AppError> {
        let students = self
            .store
            .load()
            .await
            .map_err(AppError::storage("Could not read student"))?;

        students
            .into_iter()
            .find(|s| s.login == login)
            .ok_or_else(not_found)
    }

    /// Return the student with `login`, creating an empty one first if none exists.
    pub async fn create_or_get_student(&self, login: &str) -> Result<Student, AppError> {
        self.store
            .update(|students| -> Result<_, AppError> {
                if let Some(existing) = students.iter().find(|s| s.login == login) {
                    tracing::debug!("Found student {}", login);
                    return Ok((existing.clone(), false));
                }

                let student = Student::new(login);
                students.push(student.clone());
                tracing::info!("Created student {}", login);
                Ok((student, true))
            })
            .await
            .map_err(storage_as("Could not create or fetch student"))
    }

    /// Merge the recognized fields of `patch` into the student with `login`.
    pub async fn update_student(
        &self,
        login: &str,
        patch: UpdateStudentRequest,
    ) -> Result<Student, AppError> {
        self.store
            .update(|students| -> Result<_, AppError> {
                let student = students
                    .iter_mut()
                    .find(|s| s.login == login)
                    .ok_or_else(not_found)?;
                student.apply(patch);
                Ok((student.clone(), true))
            })
            .await
            .map_err(storage_as("Could not update student"))
    }

    /// Append `badge` to the student's badge list. Repeated awards are kept.
    pub async fn add_badge(&self, login: &str, badge: &str) -> Result<Student, AppError> {
        self.store
            .update(|students| -> Result<_, AppError> {
                let student = students
                    .iter_mut()
                    .find(|s| s.login == login)
                    .ok_or_else(not_found)?;
                student.badges.push(badge.to_string());
                Ok((student.clone(), true))
            })
            .await
            .map_err(storage_as("Could not add badge"))
    }
}

// ==================== TEACHERS ====================

/// Teacher records, keyed by login.
#[derive(Debug)]
pub struct TeacherRepository {
    store: RecordStore<Teacher>,
}

impl TeacherRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            store: RecordStore::new(path),
        }
    }

    /// List all teachers in insertion order.
    pub async fn list_teachers(&self) -> Result<Vec<Teacher>, AppError> {
        self.store
            .load()
            .await
            .map_err(AppError::storage("Could not read teachers"))
    }

    /// Return the teacher with `login`, creating it (stamped with the current time) if needed.
    pub async fn create_or_get_teacher(&self, login: &str) -> Result<Teacher, AppError> {
        self.store
            .update(|teachers| -> Result<_, AppError> {
                if let Some(existing) = teachers.iter().find(|t| t.login == login) {
                    tracing::info!("Found teacher {}", login);
                    return Ok((existing.clone(), false));
                }

                let teacher = Teacher::new(login, Utc::now());
                teachers.push(teacher.clone());
                tracing::info!("Created teacher {}", login);
                Ok((teacher, true))
            })
            .await
            .map_err(storage_as("Could not create teacher"))
    }
}

// ==================== BADGES ====================

/// Badge catalog, keyed by id.
#[derive(Debug)]
pub struct BadgeRepository {
    store: RecordStore<Badge>,
}

impl BadgeRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            store: RecordStore::new(path),
        }
    }

    /// List all badges in insertion order.
    pub async fn list_badges(&self) -> Result<Vec<Badge>, AppError> {
        self.store
            .load()
            .await
            .map_err(AppError::storage("Could not read badges"))
    }

    /// Add `badge` to the catalog. An existing id is rejected, never returned.
    pub async fn create_badge(&self, badge: Badge) -> Result<Badge, AppError> {
        self.store
            .update(|badges| -> Result<_, AppError> {
                if badges.iter().any(|b| b.id == badge.id) {
                    return Err(AppError::BadRequest("badge exists".to_string()));
                }

                badges.push(badge.clone());
                tracing::info!("Created badge {}", badge.id);
                Ok((badge, true))
            })
            .await
            .map_err(storage_as("Could not create badge"))
    }
}

// ==================== TASKS ====================

/// Read-only task catalog. The file is maintained by hand and never created here.
#[derive(Debug)]
pub struct TaskCatalog {
    path: PathBuf,
}

impl TaskCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub async fn list_tasks(&self) -> Result<Vec<Task>, AppError> {
        read_array(&self.path)
            .await
            .map_err(AppError::storage("Could not read tasks"))
    }
}

fn not_found() -> AppError {
    AppError::NotFound("not found".to_string())
}

/// Give storage failures from a read-modify-write cycle the operation's message.
/// Other errors raised inside the cycle pass through unchanged.
fn storage_as(message: &'static str) -> impl Fn(AppError) -> AppError {
    move |err| match err {
        AppError::Storage { source, .. } => AppError::Storage {
            message: message.to_string(),
            source,
        },
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaskId;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_create_or_get_student_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let repo = StudentRepository::new(dir.path().join("students.json"));

        let first = repo.create_or_get_student("ada").await.unwrap();
        let patch = UpdateStudentRequest {
            xp: Some(12.into()),
            ..Default::default()
        };
        repo.update_student("ada", patch).await.unwrap();

        let again = repo.create_or_get_student("ada").await.unwrap();

        assert_eq!(first.xp.as_i64(), Some(0));
        assert_eq!(again.xp.as_i64(), Some(12));
        assert_eq!(repo.list_students().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_add_badge_appends_duplicates() {
        let dir = TempDir::new().unwrap();
        let repo = StudentRepository::new(dir.path().join("students.json"));
        repo.create_or_get_student("ada").await.unwrap();

        repo.add_badge("ada", "star").await.unwrap();
        let student = repo.add_badge("ada", "star").await.unwrap();

        assert_eq!(student.badges, vec!["star".to_string(), "star".to_string()]);
        assert_eq!(repo.get_student("ada").await.unwrap().badges.len(), 2);
    }

    #[tokio::test]
    async fn test_add_badge_unknown_login_leaves_file_untouched() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("students.json");
        let repo = StudentRepository::new(&path);
        repo.create_or_get_student("ada").await.unwrap();
        let before = std::fs::read_to_string(&path).unwrap();

        let err = repo.add_badge("nobody", "star").await.unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
    }

    #[tokio::test]
    async fn test_legacy_records_stay_usable() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("students.json");
        std::fs::write(
            &path,
            r#"[{"login":"ada","xp":3,"badges":null},{"login":"eve","xp":2.5,"badges":[]}]"#,
        )
        .unwrap();
        let repo = StudentRepository::new(&path);

        let students = repo.list_students().await.unwrap();
        assert_eq!(students.len(), 2);
        assert_eq!(students[1].xp.as_f64(), Some(2.5));

        let ada = repo.add_badge("ada", "star").await.unwrap();
        assert_eq!(ada.badges, vec!["star".to_string()]);
        assert_eq!(repo.get_student("eve").await.unwrap().xp.as_f64(), Some(2.5));
    }

    #[tokio::test]
    async fn test_update_student_keeps_login_and_unpatched_fields() {
        let dir = TempDir::new().unwrap();
        let repo = StudentRepository::new(dir.path().join("students.json"));
        repo.create_or_get_student("ada").await.unwrap();
        repo.add_badge("ada", "star").await.unwrap();

        let patch = UpdateStudentRequest {
            completed_tasks: Some(vec![TaskId::Number(1), TaskId::Text("t2".into())]),
            ..Default::default()
        };
        let student = repo.update_student("ada", patch).await.unwrap();

        assert_eq!(student.login, "ada");
        assert_eq!(student.badges, vec!["star".to_string()]);
        assert_eq!(student.completed_tasks.len(), 2);
    }

    #[tokio::test]
    async fn test_corrupt_students_file_reports_operation_message() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("students.json");
        std::fs::write(&path, "not json").unwrap();
        let repo = StudentRepository::new(&path);

        let err = repo.create_or_get_student("ada").await.unwrap_err();

        assert_eq!(err.message(), "Could not create or fetch student");
    }

    #[tokio::test]
    async fn test_teacher_created_at_is_stable() {
        let dir = TempDir::new().unwrap();
        let repo = TeacherRepository::new(dir.path().join("teachers.json"));

        let created = repo.create_or_get_teacher("grace").await.unwrap();
        let found = repo.create_or_get_teacher("grace").await.unwrap();

        assert_eq!(created, found);
        assert_eq!(repo.list_teachers().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_badge_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("badges.json");
        let repo = BadgeRepository::new(&path);
        let badge = Badge {
            id: "first".into(),
            title: "First".into(),
            icon: String::new(),
            extra: Default::default(),
        };
        repo.create_badge(badge.clone()).await.unwrap();
        let before = std::fs::read_to_string(&path).unwrap();

        let err = repo.create_badge(badge).await.unwrap_err();

        assert!(matches!(err, AppError::BadRequest(ref m) if m == "badge exists"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
    }

    #[tokio::test]
    async fn test_missing_task_catalog_is_not_created() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tasks.json");
        let catalog = TaskCatalog::new(&path);

        let err = catalog.list_tasks().await.unwrap_err();

        assert_eq!(err.message(), "Could not read tasks");
        assert!(!path.exists());
    }
}
