//! Extension-to-language table and per-language conventions (C5, spec
//! §4.5), consulted by the language-compliance (H15), comprehensive-
//! comments (H14), and test-authenticity (H16) hooks.

use once_cell::sync::Lazy;
use regex::Regex;

/// One supported language's file-layout and source-form conventions.
pub struct LanguageProfile {
    pub name: &'static str,
    pub extensions: &'static [&'static str],
    /// Filenames that, if present anywhere in the repo root, count as
    /// "a lint config exists" for this language.
    pub lint_config_files: &'static [&'static str],
    /// Filenames that count as "a test config exists".
    pub test_config_files: &'static [&'static str],
    /// Conventional test-folder names for this language.
    pub test_folders: &'static [&'static str],
    /// `{name}` is replaced with the source file's stem to produce the
    /// expected test-file name.
    pub test_name_template: &'static str,
    /// MATLAB is the one language exempt from the lint-config
    /// requirement (spec §4.7 H15).
    pub exempt_from_lint_config: bool,
    function_regex_source: &'static str,
    test_construct_regex_source: &'static str,
}

static LANGUAGES: &[LanguageProfile] = &[
    LanguageProfile {
        name: "python",
        extensions: &[".py"],
        lint_config_files: &[".flake8", "pyproject.toml", "setup.cfg", ".pylintrc"],
        test_config_files: &["pytest.ini", "pyproject.toml", "tox.ini"],
        test_folders: &["tests", "test"],
        test_name_template: "test_{name}.py",
        exempt_from_lint_config: false,
        function_regex_source: r"^\s*(?:async\s+)?def\s+(\w+)\s*\([^)]*\)\s*(?:->\s*\w+)?\s*:",
        test_construct_regex_source: r"def\s+test_\w+\s*\(",
    },
    LanguageProfile {
        name: "javascript",
        extensions: &[".js", ".jsx"],
        lint_config_files: &[".eslintrc", ".eslintrc.json", ".eslintrc.js"],
        test_config_files: &["jest.config.js", "package.json"],
        test_folders: &["__tests__", "test", "tests"],
        test_name_template: "{name}.test.js",
        exempt_from_lint_config: false,
        function_regex_source: r"^\s*(?:async\s+)?function\s+(\w+)\s*\([^)]*\)\s*\{|^\s*(?:async\s+)?(\w+)\s*\([^)]*\)\s*\{|^\s*(?:async\s+)?(\w+)\s*\([^)]*\)\s*=>",
        test_construct_regex_source: r#"(?:test|it)\s*\(\s*['"]"#,
    },
    LanguageProfile {
        name: "typescript",
        extensions: &[".ts", ".tsx"],
        lint_config_files: &[".eslintrc", "tsconfig.json"],
        test_config_files: &["jest.config.ts", "vitest.config.ts", "package.json"],
        test_folders: &["__tests__", "test", "tests"],
        test_name_template: "{name}.test.ts",
        exempt_from_lint_config: false,
        function_regex_source: r"^\s*(?:async\s+)?function\s+(\w+)\s*\([^)]*\)\s*\{|^\s*(?:async\s+)?(\w+)\s*\([^)]*\)\s*\{|^\s*(?:async\s+)?(\w+)\s*\([^)]*\)\s*=>",
        test_construct_regex_source: r#"(?:test|it)\s*\(\s*['"]"#,
    },
    LanguageProfile {
        name: "java",
        extensions: &[".java"],
        lint_config_files: &["checkstyle.xml", ".checkstyle"],
        test_config_files: &["pom.xml", "build.gradle"],
        test_folders: &["src/test/java"],
        test_name_template: "{Name}Test.java",
        exempt_from_lint_config: false,
        function_regex_source: r"^\s*(public|private|protected|static|abstract)*\s+\w+\s+(\w+)\s*\([^)]*\)\s*\{?",
        test_construct_regex_source: r"@Test\b|void\s+test\w+\s*\(",
    },
    LanguageProfile {
        name: "c",
        extensions: &[".c", ".h"],
        lint_config_files: &[".clang-format", ".clang-tidy"],
        test_config_files: &["Makefile", "CMakeLists.txt"],
        test_folders: &["tests", "test"],
        test_name_template: "test_{name}.c",
        exempt_from_lint_config: false,
        function_regex_source: r"^\s*\w+[\s\*&]+(\w+)\s*\([^)]*\)\s*\{?",
        test_construct_regex_source: r"TEST\(|TEST_F\(",
    },
    LanguageProfile {
        name: "cpp",
        extensions: &[".cpp", ".cc", ".cxx", ".c++", ".hpp"],
        lint_config_files: &[".clang-format", ".clang-tidy"],
        test_config_files: &["CMakeLists.txt"],
        test_folders: &["tests", "test"],
        test_name_template: "{name}_test.cpp",
        exempt_from_lint_config: false,
        function_regex_source: r"^\s*\w+[\s\*&]+(\w+)\s*\([^)]*\)\s*\{?",
        test_construct_regex_source: r"TEST\(|TEST_F\(",
    },
    LanguageProfile {
        name: "csharp",
        extensions: &[".cs"],
        lint_config_files: &[".editorconfig"],
        test_config_files: &["*.csproj"],
        test_folders: &["Tests"],
        test_name_template: "{Name}Tests.cs",
        exempt_from_lint_config: false,
        function_regex_source: r"^\s*(?:public|private|protected)*\s+\w+\s+(\w+)\s*\([^)]*\)\s*\{?",
        test_construct_regex_source: r"\[Test\]|\[Fact\]",
    },
    LanguageProfile {
        name: "go",
        extensions: &[".go"],
        lint_config_files: &[".golangci.yml", ".golangci.yaml"],
        test_config_files: &["go.mod"],
        test_folders: &["tests", "test"],
        test_name_template: "{name}_test.go",
        exempt_from_lint_config: false,
        function_regex_source: r"^\s*func\s+(?:\(\w+\s+[\w\*]+\)\s+)?([A-Z]\w+)\s*\([^)]*\)\s*\w*\s*\{?",
        test_construct_regex_source: r"func\s+Test\w+\s*\(",
    },
    LanguageProfile {
        name: "rust",
        extensions: &[".rs"],
        lint_config_files: &["clippy.toml", "rustfmt.toml"],
        test_config_files: &["Cargo.toml"],
        test_folders: &["tests"],
        test_name_template: "{name}_test.rs",
        exempt_from_lint_config: false,
        function_regex_source: r"^\s*(?:pub\s+)?(?:async\s+)?fn\s+(\w+)\s*\([^)]*\)(?:\s*->\s*[\w:&<>\[\]]+)?\s*\{?",
        test_construct_regex_source: r"#\[test\]",
    },
    LanguageProfile {
        name: "php",
        extensions: &[".php", ".php3", ".php4", ".php5", ".php7", ".php8"],
        lint_config_files: &[".php-cs-fixer.php", "phpcs.xml"],
        test_config_files: &["phpunit.xml"],
        test_folders: &["tests", "test"],
        test_name_template: "{Name}Test.php",
        exempt_from_lint_config: false,
        function_regex_source: r"^\s*(?:public|private|protected)?\s*function\s+(\w+)\s*\([^)]*\)\s*\{?",
        test_construct_regex_source: r"public\s+function\s+test\w+\s*\(",
    },
    LanguageProfile {
        name: "ruby",
        extensions: &[".rb"],
        lint_config_files: &[".rubocop.yml"],
        test_config_files: &[".rspec"],
        test_folders: &["spec", "test"],
        test_name_template: "{name}_spec.rb",
        exempt_from_lint_config: false,
        function_regex_source: r"^\s*def\s+(\w+)\s*\([^)]*\)?",
        test_construct_regex_source: r#"\bit\s*['"]|\bdef\s+test_\w+"#,
    },
    LanguageProfile {
        name: "swift",
        extensions: &[".swift"],
        lint_config_files: &[".swiftlint.yml"],
        test_config_files: &["Package.swift"],
        test_folders: &["Tests"],
        test_name_template: "{Name}Tests.swift",
        exempt_from_lint_config: false,
        function_regex_source: r"^\s*func\s+(\w+)\s*\([^)]*\)",
        test_construct_regex_source: r"func\s+test\w+\s*\(",
    },
    LanguageProfile {
        name: "kotlin",
        extensions: &[".kt", ".kts"],
        lint_config_files: &["detekt.yml"],
        test_config_files: &["build.gradle.kts"],
        test_folders: &["src/test/kotlin"],
        test_name_template: "{Name}Test.kt",
        exempt_from_lint_config: false,
        function_regex_source: r"^\s*fun\s+(\w+)\s*\([^)]*\)",
        test_construct_regex_source: r"@Test\b",
    },
    LanguageProfile {
        name: "r",
        extensions: &[".r"],
        lint_config_files: &[".lintr"],
        test_config_files: &["DESCRIPTION"],
        test_folders: &["tests"],
        test_name_template: "test-{name}.R",
        exempt_from_lint_config: false,
        function_regex_source: r"^\s*(\w+)\s*<-\s*function\s*\(",
        test_construct_regex_source: r"test_that\s*\(",
    },
    LanguageProfile {
        name: "matlab",
        extensions: &[".m"],
        lint_config_files: &[],
        test_config_files: &["runtests.m"],
        test_folders: &["tests"],
        test_name_template: "test{Name}.m",
        exempt_from_lint_config: true,
        function_regex_source: r"^\s*function\s+.*=\s*(\w+)\s*\(",
        test_construct_regex_source: r"function\s+test\w+\s*\(",
    },
];

static FUNCTION_REGEXES: Lazy<Vec<Regex>> = Lazy::new(|| {
    LANGUAGES
        .iter()
        .map(|profile| Regex::new(profile.function_regex_source).unwrap())
        .collect()
});

static TEST_CONSTRUCT_REGEXES: Lazy<Vec<Regex>> = Lazy::new(|| {
    LANGUAGES
        .iter()
        .map(|profile| Regex::new(profile.test_construct_regex_source).unwrap())
        .collect()
});

fn index_of(name: &str) -> Option<usize> {
    LANGUAGES.iter().position(|profile| profile.name == name)
}

/// Detect the language of `path` by extension, `None` if unrecognized
/// (unknown languages are exempt from language-specific checks).
pub fn detect_language(path: &str) -> Option<&'static LanguageProfile> {
    let lowered = path.to_lowercase();
    LANGUAGES
        .iter()
        .find(|profile| profile.extensions.iter().any(|ext| lowered.ends_with(ext)))
}

/// The compiled function-definition regex for `profile`.
pub fn function_regex(profile: &LanguageProfile) -> &'static Regex {
    &FUNCTION_REGEXES[index_of(profile.name).expect("profile is a member of LANGUAGES")]
}

/// The compiled test-function-construct regex for `profile`.
pub fn test_construct_regex(profile: &LanguageProfile) -> &'static Regex {
    &TEST_CONSTRUCT_REGEXES[index_of(profile.name).expect("profile is a member of LANGUAGES")]
}

/// All registered language profiles, for iteration (e.g. H15's
/// per-touched-language sweep).
pub fn all() -> &'static [LanguageProfile] {
    LANGUAGES
}
