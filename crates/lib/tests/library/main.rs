mod common;
mod pipeline_tests;
mod stage_tests;
