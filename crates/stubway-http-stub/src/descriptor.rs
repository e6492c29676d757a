//! Stub descriptor loading.
//!
//! Descriptors are UTF-8 JSON files in the engine's stub-mapping format.
//! Only files whose name ends with `.json` are accepted.

use crate::engine::mapping::StubMapping;
use crate::error::AdapterError;
use std::fs;
use std::path::Path;

/// Whether a file is a loadable stub descriptor. Name check only, no I/O.
pub fn is_accepted(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.ends_with(".json"))
}

/// Read a descriptor file and parse it into a stub mapping.
pub fn load(path: &Path) -> Result<StubMapping, AdapterError> {
    let text = fs::read_to_string(path).map_err(|e| AdapterError::DescriptorRead {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    StubMapping::from_json(&text).map_err(|e| AdapterError::DescriptorRead {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_accept_filter() {
        assert!(is_accepted(Path::new("user.json")));
        assert!(is_accepted(Path::new("/stubs/nested/greet.json")));
        assert!(!is_accepted(Path::new("user.yaml")));
        assert!(!is_accepted(Path::new("user.JSON")));
        assert!(!is_accepted(Path::new("json")));
    }

    #[test]
    fn test_load_valid_descriptor() {
        let mut file = tempfile::NamedTempFile::with_suffix(".json").unwrap();
        write!(
            file,
            r#"{{"request": {{"url": "/user"}}, "response": {{"status": 200, "body": "ok"}}}}"#
        )
        .unwrap();

        let mapping = load(file.path()).unwrap();
        assert_eq!(mapping.request.url.as_deref(), Some("/user"));
        assert_eq!(mapping.response.body.as_deref(), Some("ok"));
    }

    #[test]
    fn test_load_invalid_json_fails() {
        let mut file = tempfile::NamedTempFile::with_suffix(".json").unwrap();
        write!(file, "{{ broken").unwrap();

        let err = load(file.path()).unwrap_err();
        assert!(matches!(err, AdapterError::DescriptorRead { .. }));
    }

    #[test]
    fn test_load_missing_file_fails() {
        let err = load(Path::new("/nonexistent/mapping.json")).unwrap_err();
        assert!(matches!(err, AdapterError::DescriptorRead { .. }));
    }
}
