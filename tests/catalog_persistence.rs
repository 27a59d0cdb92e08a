//! Reopening a catalog from the same storage file must reproduce exactly the
//! sequence that was in memory before, after every kind of mutation.

use std::fs;
use std::path::Path;

use library_catalog::{AddOutcome, Book, Catalog, CatalogError};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn reopen(path: &Path) -> Vec<Book> {
    Catalog::open(path).unwrap().list_all().to_vec()
}

#[test]
fn add_persists_in_order() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("library.txt");
    let mut catalog = Catalog::open(&path).unwrap();

    catalog.add(7, "Dune", "Herbert").unwrap();
    catalog.add(2, "Emma", "Austen").unwrap();
    catalog.add(11, "Ulysses", "Joyce").unwrap();

    assert_eq!(reopen(&path), catalog.list_all());
    let ids: Vec<i64> = reopen(&path).iter().map(|b| b.id).collect();
    assert_eq!(ids, vec![7, 2, 11]);
}

#[test]
fn issue_and_return_persist() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("library.txt");
    let mut catalog = Catalog::open(&path).unwrap();
    catalog.add(7, "Dune", "Herbert").unwrap();
    catalog.add(8, "Emma", "Austen").unwrap();

    catalog.issue(8).unwrap();
    let reloaded = reopen(&path);
    assert_eq!(reloaded, catalog.list_all());
    assert!(reloaded[1].issued);

    catalog.return_book(8).unwrap();
    let reloaded = reopen(&path);
    assert_eq!(reloaded, catalog.list_all());
    assert!(!reloaded[1].issued);
}

#[test]
fn rejected_operations_leave_file_untouched() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("library.txt");
    let mut catalog = Catalog::open(&path).unwrap();
    catalog.add(1, "Dune", "Herbert").unwrap();
    let before = fs::read_to_string(&path).unwrap();

    assert!(matches!(catalog.issue(42), Err(CatalogError::NotFound(42))));
    assert!(matches!(
        catalog.return_book(1),
        Err(CatalogError::NotIssued(1))
    ));
    assert!(catalog.search(42).is_err());

    assert_eq!(fs::read_to_string(&path).unwrap(), before);
}

#[test]
fn delimiters_in_titles_survive_reload() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("library.txt");
    let mut catalog = Catalog::open(&path).unwrap();
    catalog.add(1, "AC|DC: a biography", r"Someone \ Else").unwrap();

    let reloaded = reopen(&path);
    assert_eq!(reloaded[0].title, "AC|DC: a biography");
    assert_eq!(reloaded[0].author, r"Someone \ Else");
}

#[test]
fn duplicate_ids_persist_but_stay_shadowed() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("library.txt");
    let mut catalog = Catalog::open(&path).unwrap();
    catalog.add(5, "First", "A").unwrap();
    assert_eq!(catalog.add(5, "Second", "B").unwrap(), AddOutcome::Duplicate);
    catalog.issue(5).unwrap();

    let mut reloaded = Catalog::open(&path).unwrap();
    assert_eq!(reloaded.len(), 2);
    assert_eq!(reloaded.search(5).unwrap().title, "First");
    assert!(matches!(
        reloaded.issue(5),
        Err(CatalogError::AlreadyIssued(5))
    ));
    assert!(!reloaded.list_all()[1].issued);
}

#[test]
fn legacy_file_loads_and_is_rewritten_in_place() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("library.txt");
    fs::write(&path, "1|Dune|Herbert|0\n\n2|Emma|Austen|1\nbroken line\n").unwrap();

    let mut catalog = Catalog::open(&path).unwrap();
    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog.skipped().len(), 1);

    catalog.return_book(2).unwrap();
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "1|Dune|Herbert|0\n2|Emma|Austen|0\n"
    );
}

#[test]
fn legacy_backslashes_survive_a_rewrite() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("library.txt");
    let original = "1|C:\\|Gates|0\n2|Dune|Herbert|0\n3|a\\\\b|c\\d|1\n";
    fs::write(&path, original).unwrap();

    let mut catalog = Catalog::open(&path).unwrap();
    assert!(catalog.skipped().is_empty());
    assert_eq!(catalog.len(), 3);
    assert_eq!(catalog.search(1).unwrap().title, "C:\\");
    assert_eq!(catalog.search(3).unwrap().title, "a\\\\b");

    catalog.issue(2).unwrap();
    catalog.return_book(2).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), original);
}

#[test]
fn text_is_stored_exactly_as_given() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("library.txt");
    let mut catalog = Catalog::open(&path).unwrap();
    catalog.add(1, "  Dune  ", "").unwrap();

    let reloaded = reopen(&path);
    assert_eq!(reloaded[0].title, "  Dune  ");
    assert_eq!(reloaded[0].author, "");
}

#[test]
fn independent_catalogs_do_not_interfere() {
    let tmp = TempDir::new().unwrap();
    let mut first = Catalog::open(tmp.path().join("a.txt")).unwrap();
    let mut second = Catalog::open(tmp.path().join("b.txt")).unwrap();

    first.add(1, "Dune", "Herbert").unwrap();
    second.add(2, "Emma", "Austen").unwrap();

    assert_eq!(reopen(&tmp.path().join("a.txt")).len(), 1);
    assert_eq!(reopen(&tmp.path().join("b.txt"))[0].id, 2);
}
