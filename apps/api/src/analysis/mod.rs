// Resume analysis pipeline: upload -> extraction -> scoring -> response.
// The handler owns the scratch file for the whole request.

pub mod handlers;
