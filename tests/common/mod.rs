#![allow(dead_code)]

pub use docgraph_test_utils::builders;
pub use docgraph_test_utils::recorder;
pub use docgraph_test_utils::{init_tracing, with_timeout};
