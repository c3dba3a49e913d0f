/// Remote documents are keyed by opaque string ids (24-hex object ids).
pub type EntityId = String;
