/// Why a page component could not mount. Recoverable: the page keeps running
/// without the component.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MountError {
    #[error("container `{0}` not found")]
    ContainerNotFound(String),
    #[error("no slides in container `{0}`")]
    NoSlides(String),
}
