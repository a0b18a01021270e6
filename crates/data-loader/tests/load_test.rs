//! Integration tests that load both datasets from files on disk.

use data_loader::{DataLoadError, MovieDataset, MusicDataset, Profile, PromptStyle};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(dir: &Path, name: &str, contents: &[u8]) {
    fs::write(dir.join(name), contents).unwrap();
}

fn movielens_fixture() -> TempDir {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "users.dat",
        b"1::F::25::10::48067\n2::M::56::16::70072\n3::M::99::15::55117\n",
    );
    write(
        dir.path(),
        "movies.dat",
        b"1::Movie A (1995)::Animation|Comedy\n2::Movie B (1999)::Drama\n3::Movie C (2000)::Action\n",
    );
    write(
        dir.path(),
        "ratings.dat",
        b"1::1::5::978300760\n1::2::2::978302109\n2::3::4::978301968\n2::404::4::978301968\n",
    );
    dir
}

#[test]
fn test_load_movielens_from_files() {
    let dir = movielens_fixture();
    let dataset = MovieDataset::load_from_files(dir.path()).unwrap();

    // user 3 has an unknown age code and is skipped
    assert_eq!(dataset.len(), 2);
    assert_eq!(
        dataset.get(1).unwrap().prompt(),
        "I am a Female of age 25-34 and I rank movies as follows: Movie A (1995): 5, Movie B (1999): 2"
    );
    assert_eq!(
        dataset.get(2).unwrap().prompt(),
        "I am a Male of age 56+ and I rank movies as follows: Movie C (2000): 4"
    );
}

#[test]
fn test_movielens_missing_ratings_file() {
    let dir = movielens_fixture();
    fs::remove_file(dir.path().join("ratings.dat")).unwrap();

    let err = MovieDataset::load_from_files(dir.path()).unwrap_err();
    match err {
        DataLoadError::FileNotFound { path } => assert!(path.ends_with("ratings.dat")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_load_amazon_from_files() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "Amazon_CDs_and_Vinyl.item",
        b"item_id:token\ttitle:token\tsales_type:token\tcategories:token_seq\tbrand:token\n\
          0001\tT1\tCD\t\tB1\n\
          0002\tT2\tLP\t['Jazz', 'Bebop']\tB2\n",
    );
    write(
        dir.path(),
        "Amazon_CDs_and_Vinyl.inter",
        b"user_id:token\titem_id:token\trating:float\ttimestamp:float\n\
          A\t1\t4.0\t10\n\
          A\t3\t5.0\t11\n\
          B\t2\t5.0\t12\n\
          B\t1\t1.0\t13\n",
    );

    let dataset = MusicDataset::load_from_files(dir.path(), PromptStyle::Summary).unwrap();
    assert_eq!(dataset.len(), 2);
    assert_eq!(
        dataset.get("A").unwrap().prompt(),
        "I have rated 1 items. T1 of B1 in unknown category: 4"
    );
    assert_eq!(
        dataset.get("B").unwrap().prompt(),
        "I have rated 2 items. T2 of B2 in Jazz, Bebop category: 5, T1 of B1 in unknown category: 1"
    );

    let ids: Vec<&str> = dataset.iter().map(|u| u.id.as_str()).collect();
    assert_eq!(ids, vec!["A", "B"]);
}
