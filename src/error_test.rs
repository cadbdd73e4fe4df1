use super::*;

#[test]
fn container_not_found_names_the_id() {
    let err = MapperError::ContainerNotFound("zoom-draw".to_owned());
    assert_eq!(err.to_string(), "container not found: #zoom-draw");
}

#[test]
fn image_load_names_the_url() {
    let err = MapperError::ImageLoad { url: "img/photo.jpg".to_owned() };
    assert_eq!(err.to_string(), "failed to load image: img/photo.jpg");
}

#[test]
fn serde_error_converts_to_invalid_config() {
    let serde_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let err: MapperError = serde_err.into();
    assert!(matches!(err, MapperError::InvalidConfig(_)));
}

#[test]
fn repeated_load_message() {
    assert_eq!(MapperError::AlreadyLoaded.to_string(), "image already loaded or loading");
}
