#![allow(unused_imports)]

pub use procmgr_test_utils::builders;
pub use procmgr_test_utils::fake_backend;
pub use procmgr_test_utils::{init_tracing, wait_until, with_timeout};
