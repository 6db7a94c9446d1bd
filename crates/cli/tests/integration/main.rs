mod build_tests;
mod common;
mod deploy_tests;
mod kickstart_tests;
