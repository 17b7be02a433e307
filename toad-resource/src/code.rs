//! Response codes the dispatcher answers with.
//!
//! These are plain [`toad_msg::Code`]s; the constants here are the
//! subset the server produces on its own. Dynamic-resource handlers
//! are of course free to answer with anything.

pub use toad_msg::Code;

// 2.xx
code!(rfc7252("5.9.1.1") CREATED = 2 . 01);
code!(rfc7252("5.9.1.2") DELETED = 2 . 02);
code!(rfc7252("5.9.1.4") CHANGED = 2 . 04);
code!(rfc7252("5.9.1.5") CONTENT = 2 . 05);

// 4.xx
code!(rfc7252("5.9.2.4") FORBIDDEN          = 4 . 03);
code!(rfc7252("5.9.2.5") NOT_FOUND          = 4 . 04);
code!(rfc7252("5.9.2.6") METHOD_NOT_ALLOWED = 4 . 05);

// 5.xx
code!(rfc7252("5.9.3.1") INTERNAL_SERVER_ERROR = 5 . 00);
