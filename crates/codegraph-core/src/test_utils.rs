//! Test fixtures: small on-disk Java source trees for pipeline-level tests.

use std::fs;
use tempfile::TempDir;

/// A small multi-package Java project: an interface, a class implementing
/// it, a subclass, a record, and a wildcard import.
pub fn create_test_repo() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();

    fs::create_dir_all(root.join("src/main/java/com/example/app")).unwrap();
    fs::create_dir_all(root.join("src/main/java/com/example/model")).unwrap();

    fs::write(
        root.join("src/main/java/com/example/app/Greeter.java"),
        r#"
package com.example.app;

public interface Greeter {
    String greet(String name);
}
"#,
    )
    .unwrap();

    fs::write(
        root.join("src/main/java/com/example/app/EnglishGreeter.java"),
        r#"
package com.example.app;

import com.example.model.Person;
import java.util.*;

public class EnglishGreeter implements Greeter {
    private final List<String> history = new ArrayList<>();

    @Override
    public String greet(String name) {
        history.add(name);
        return "Hello, " + name;
    }

    public String greetPerson(Person person) {
        return greet(person.getName());
    }
}
"#,
    )
    .unwrap();

    fs::write(
        root.join("src/main/java/com/example/app/FormalGreeter.java"),
        r#"
package com.example.app;

public class FormalGreeter extends EnglishGreeter {
    @Override
    public String greet(String name) {
        return "Good day, " + name;
    }
}
"#,
    )
    .unwrap();

    fs::write(
        root.join("src/main/java/com/example/model/Person.java"),
        r#"
package com.example.model;

public record Person(String name, int age) {
}
"#,
    )
    .unwrap();

    temp_dir
}

/// A minimal single-file Java project.
pub fn create_simple_repo() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();

    fs::create_dir_all(root.join("src")).unwrap();

    fs::write(
        root.join("src/Main.java"),
        r#"
public class Main {
    public static void main(String[] args) {
        System.out.println("Hello!");
    }
}
"#,
    )
    .unwrap();

    temp_dir
}

/// Build an arbitrary file tree from `(relative_path, content)` pairs.
pub fn create_repo_with_structure(structure: &[(&str, &str)]) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();

    for (path, content) in structure {
        let full_path = root.join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&full_path, content).unwrap();
    }

    temp_dir
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_test_repo() {
        let temp_dir = create_test_repo();
        let root = temp_dir.path();

        assert!(root.join("src/main/java/com/example/app/Greeter.java").exists());
        assert!(root
            .join("src/main/java/com/example/app/EnglishGreeter.java")
            .exists());
        assert!(root.join("src/main/java/com/example/model/Person.java").exists());
    }
}
