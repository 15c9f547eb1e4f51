//! Repository layer: one zero-sized struct per table group.

pub mod attachment_repo;
pub mod board_repo;
pub mod karma_repo;
pub mod mail_queue_repo;
pub mod member_repo;
pub mod moderation_log_repo;
pub mod notify_repo;
pub mod permission_repo;
pub mod read_log_repo;
pub mod scheduled_task_repo;
pub mod settings_repo;
pub mod topic_repo;

pub use attachment_repo::AttachmentRepo;
pub use board_repo::BoardRepo;
pub use karma_repo::KarmaRepo;
pub use mail_queue_repo::MailQueueRepo;
pub use member_repo::MemberRepo;
pub use moderation_log_repo::ModerationLogRepo;
pub use notify_repo::NotifyRepo;
pub use permission_repo::PermissionRepo;
pub use read_log_repo::ReadLogRepo;
pub use scheduled_task_repo::ScheduledTaskRepo;
pub use settings_repo::SettingsRepo;
pub use topic_repo::TopicRepo;
