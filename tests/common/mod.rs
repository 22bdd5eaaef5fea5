#![allow(dead_code)]

pub use cmdstream_test_utils::{init_tracing, with_timeout};
