mod software;
pub use software::NglSoftwareBackend;
