//! The structural comparator.

use std::collections::BTreeSet;
use std::fmt::{Debug, Display};

use gencheck_model::{Configuration, Package, Project};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::{
    CompareError, ExpectedConfiguration, ExpectedFile, ExpectedPackage, ExpectedProject, Result,
};

/// Check `actual` against `expected`. The first difference found is
/// reported; neither model is modified.
pub fn compare(expected: &ExpectedProject, actual: &Project) -> Result<()> {
    let scope = Scope::root();

    check(&scope.field("name"), &expected.name, &actual.name)?;
    check(&scope.field("path"), &expected.path, &actual.path)?;

    let names = actual.configurations();
    check_count(scope.field("configurations"), expected.configurations.len(), names.len())?;
    for (index, (expected, actual)) in expected.configurations.iter().zip(names).enumerate() {
        if expected != actual {
            return Err(mismatch(
                format!("{}[{index}]", scope.field("configurations")),
                format!("{expected:?}"),
                format!("{actual:?}"),
            ));
        }
    }

    let packages = actual.packages();
    check_count(scope.field("packages"), expected.packages.len(), packages.len())?;
    for (index, (expected, actual)) in expected.packages.iter().zip(packages).enumerate() {
        compare_package(&scope.child("packages", index), expected, actual)?;
    }

    tracing::debug!(
        packages = expected.packages.len(),
        "actual model satisfies expectation"
    );
    Ok(())
}

fn compare_package(scope: &Scope, expected: &ExpectedPackage, actual: &Package) -> Result<()> {
    check(&scope.field("name"), &expected.name, &actual.name)?;
    check_option(&scope.field("kind"), &expected.kind, &actual.kind)?;
    check_option(&scope.field("language"), &expected.language, &actual.language)?;
    check(&scope.field("path"), &expected.path, &actual.path)?;
    check(&scope.field("script_name"), &expected.script_name, &actual.script_name)?;
    check_option(&scope.field("compiler"), &expected.compiler, &actual.compiler)?;

    let configs = actual.configurations();
    check_count(scope.field("configurations"), expected.configurations.len(), configs.len())?;
    for (index, (expected, actual)) in expected.configurations.iter().zip(configs).enumerate() {
        compare_configuration(&scope.child("configurations", index), expected, actual)?;
    }

    compare_files(scope, &expected.files, actual)
}

fn compare_configuration(
    scope: &Scope,
    expected: &ExpectedConfiguration,
    actual: &Configuration,
) -> Result<()> {
    check(&scope.field("name"), &expected.name, &actual.name)?;
    check(&scope.field("bin_dir"), &expected.bin_dir, &actual.bin_dir)?;
    check(&scope.field("lib_dir"), &expected.lib_dir, &actual.lib_dir)?;
    check(&scope.field("obj_dir"), &expected.obj_dir, &actual.obj_dir)?;
    check(&scope.field("out_dir"), &expected.out_dir, &actual.out_dir)?;
    check(&scope.field("target"), &expected.target, &actual.target)?;
    check_option(&scope.field("kind"), &expected.kind, &actual.kind)?;
    check(&scope.field("build_options"), &expected.build_options, &actual.build_options)?;
    check(&scope.field("link_options"), &expected.link_options, &actual.link_options)?;

    check_set(&scope.field("include_paths"), &expected.include_paths, &actual.include_paths)?;
    check_set(&scope.field("defines"), &expected.defines, &actual.defines)?;
    check_set(&scope.field("lib_paths"), &expected.lib_paths, &actual.lib_paths)?;
    check_set(&scope.field("dependencies"), &expected.dependencies, &actual.dependencies)?;
    check_flags(&scope.field("build_flags"), &expected.build_flags, &actual.build_flags)?;
    check_flags(&scope.field("link_flags"), &expected.link_flags, &actual.link_flags)?;

    check_list(&scope.field("links"), &expected.links, &actual.links)?;
    check_list(&scope.field("link_deps"), &expected.link_deps, &actual.link_deps)
}

/// Files are looked up by name, so the expected list may be in any order.
/// Names must be distinct; with equal counts every actual file is then
/// matched exactly once.
fn compare_files(scope: &Scope, expected: &[ExpectedFile], actual: &Package) -> Result<()> {
    let files = actual.files();
    check_count(scope.field("files"), expected.len(), files.len())?;
    if expected.is_empty() {
        return Ok(());
    }

    let mut seen = FxHashSet::default();
    if let Some(duplicate) = expected.iter().find(|f| !seen.insert(f.name.as_str())) {
        return Err(CompareError::DuplicateFile {
            field: scope.field("files"),
            name: duplicate.name.clone(),
        });
    }

    let by_name: FxHashMap<&str, _> = files.iter().map(|f| (f.name.as_str(), f)).collect();
    for expected in expected {
        let Some(file) = by_name.get(expected.name.as_str()) else {
            return Err(CompareError::MissingFile {
                field: scope.field("files"),
                name: expected.name.clone(),
                actual_names: files.iter().map(|f| f.name.clone()).collect(),
            });
        };

        let scope = scope.keyed("files", &expected.name);
        check_option(&scope.field("subtype"), &expected.subtype, &file.subtype)?;
        check_option(&scope.field("build_action"), &expected.build_action, &file.build_action)?;
        check_option(&scope.field("depends_on"), &expected.depends_on, &file.depends_on)?;
    }
    Ok(())
}

/// Dotted path to the element under comparison.
struct Scope {
    path: String,
}

impl Scope {
    fn root() -> Self {
        Self {
            path: String::new(),
        }
    }

    fn field(&self, name: &str) -> String {
        if self.path.is_empty() {
            name.to_string()
        } else {
            format!("{}.{name}", self.path)
        }
    }

    fn child(&self, collection: &str, index: usize) -> Scope {
        Scope {
            path: format!("{}[{index}]", self.field(collection)),
        }
    }

    fn keyed(&self, collection: &str, key: &str) -> Scope {
        Scope {
            path: format!("{}[{key:?}]", self.field(collection)),
        }
    }
}

fn mismatch(field: String, expected: String, actual: String) -> CompareError {
    CompareError::FieldMismatch {
        field,
        expected,
        actual,
    }
}

fn check_count(collection: String, expected: usize, actual: usize) -> Result<()> {
    if expected == 0 || expected == actual {
        return Ok(());
    }
    Err(CompareError::CountMismatch {
        collection,
        expected,
        actual,
    })
}

fn check<T>(field: &str, expected: &Option<T>, actual: &T) -> Result<()>
where
    T: PartialEq + Debug,
{
    match expected {
        Some(value) if value != actual => Err(mismatch(
            field.to_string(),
            format!("{value:?}"),
            format!("{actual:?}"),
        )),
        _ => Ok(()),
    }
}

/// A field the actual model may leave unset.
fn check_option<T>(field: &str, expected: &Option<T>, actual: &Option<T>) -> Result<()>
where
    T: PartialEq + Display,
{
    match (expected, actual) {
        (Some(value), Some(found)) if value == found => Ok(()),
        (Some(value), found) => Err(mismatch(
            field.to_string(),
            value.to_string(),
            found.as_ref().map_or_else(|| "unset".to_string(), ToString::to_string),
        )),
        (None, _) => Ok(()),
    }
}

/// Order-insensitive comparison; duplicates still count.
fn check_set(field: &str, expected: &Option<Vec<String>>, actual: &[String]) -> Result<()> {
    let Some(expected) = expected else {
        return Ok(());
    };
    let mut want: Vec<&str> = expected.iter().map(String::as_str).collect();
    let mut have: Vec<&str> = actual.iter().map(String::as_str).collect();
    want.sort_unstable();
    have.sort_unstable();
    if want == have {
        Ok(())
    } else {
        Err(mismatch(field.to_string(), render(expected), render(actual)))
    }
}

fn check_flags<T>(field: &str, expected: &Option<BTreeSet<T>>, actual: &BTreeSet<T>) -> Result<()>
where
    T: Ord + Display,
{
    match expected {
        Some(flags) if flags != actual => Err(mismatch(
            field.to_string(),
            render(flags),
            render(actual),
        )),
        _ => Ok(()),
    }
}

fn check_list(field: &str, expected: &Option<Vec<String>>, actual: &[String]) -> Result<()> {
    match expected {
        Some(items) if items.as_slice() != actual => Err(mismatch(
            field.to_string(),
            render(items),
            render(actual),
        )),
        _ => Ok(()),
    }
}

fn render<T: Display>(items: impl IntoIterator<Item = T>) -> String {
    let items: Vec<String> = items.into_iter().map(|i| i.to_string()).collect();
    format!("[{}]", items.join(", "))
}
