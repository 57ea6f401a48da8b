//! School context infrastructure
//!
//! Implementations of [`SchoolContextPort`] that turn a `schoolId` into
//! text for the system prompt.
//!
//! # Components
//!
//! - [`StaticSchoolContext`] - Schools listed in the `[schools]` config table
//!
//! [`SchoolContextPort`]: tutor_application::SchoolContextPort

mod static_schools;

pub use static_schools::StaticSchoolContext;
