//! Source-location lookup supplied by the host runner.

use std::collections::HashMap;
use std::path::Path;

/// Maps a `(group, example)` pair back to the file and line defining it
pub trait Locator {
    fn locate(&self, group: &str, example: &str) -> Option<(String, u32)>;
}

impl<F> Locator for F
where
    F: Fn(&str, &str) -> Option<(String, u32)>,
{
    fn locate(&self, group: &str, example: &str) -> Option<(String, u32)> {
        self(group, example)
    }
}

/// Locator backed by a lookup table, for hosts that can list their tests up front
#[derive(Debug, Clone, Default)]
pub struct MapLocator {
    locations: HashMap<(String, String), (String, u32)>,
}

impl MapLocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, group: &str, example: &str, path: &str, line: u32) -> &mut Self {
        self.locations.insert(
            (group.to_string(), example.to_string()),
            (path.to_string(), line),
        );
        self
    }
}

impl Locator for MapLocator {
    fn locate(&self, group: &str, example: &str) -> Option<(String, u32)> {
        self.locations
            .get(&(group.to_string(), example.to_string()))
            .cloned()
    }
}

/// Rewrite `path` relative to `workdir` as `./...` when it lives below it
pub fn relative_location(path: &str, workdir: Option<&Path>) -> String {
    let Some(workdir) = workdir else {
        return path.to_string();
    };

    match Path::new(path).strip_prefix(workdir) {
        Ok(rest) => format!("./{}", rest.display()),
        Err(_) => path.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_location() {
        let workdir = Path::new("/home/ci/app");
        assert_eq!(
            relative_location("/home/ci/app/test/user_test.rb", Some(workdir)),
            "./test/user_test.rb"
        );
        assert_eq!(
            relative_location("/opt/gems/shared.rb", Some(workdir)),
            "/opt/gems/shared.rb"
        );
        assert_eq!(relative_location("test/a.rb", None), "test/a.rb");
    }

    #[test]
    fn test_map_locator() {
        let mut locator = MapLocator::new();
        locator.insert("UserTest", "test_a", "/app/test/user_test.rb", 4);

        assert_eq!(
            locator.locate("UserTest", "test_a"),
            Some(("/app/test/user_test.rb".to_string(), 4))
        );
        assert_eq!(locator.locate("UserTest", "test_b"), None);
    }

    #[test]
    fn test_closure_locator() {
        let locator = |_: &str, _: &str| Some(("a.rb".to_string(), 1));
        assert_eq!(locator.locate("G", "e"), Some(("a.rb".to_string(), 1)));
    }
}
