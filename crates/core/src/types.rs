/// Image ids are millisecond timestamps for uploads, small integers for
/// records discovered by a directory scan.
pub type ImageId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
