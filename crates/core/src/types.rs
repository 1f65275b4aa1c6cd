/// Entity primary keys are store-generated UUIDv7 (time-ordered).
pub type Id = uuid::Uuid;

/// User ids are opaque strings issued by the external identity provider.
pub type UserId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
