//! Per-rank `.dnpy` files on disk.

use std::fs::{self, File};
use std::io::Write;

use distarray::{
    export, import, load_dnpy, rank_file_name, save_dnpy, write_local_array, DistSpec,
    Distribution, Error, FixedComm, FormatVersion, LocalChunk,
};

fn fill(dist: &Distribution, rank: usize) -> LocalChunk {
    let shape = dist.local_shape(rank).unwrap();
    let len: usize = shape.iter().product();
    let values: Vec<f64> = (0..len).map(|i| rank as f64 * 1000.0 + i as f64).collect();
    LocalChunk::from_elements(shape, &values).unwrap()
}

/// Every rank saves its chunk; a second "run" loads each file and rebuilds
/// the same layout with the same bytes.
#[test]
fn test_save_and_reload_every_rank() {
    let dir = tempfile::tempdir().unwrap();
    let prefix = dir.path().join("grid");
    let prefix = prefix.to_str().unwrap();

    let comm = FixedComm::root(4);
    let dist = Distribution::from_shape(
        &comm,
        &[10, 6],
        &DistSpec::parse_seq("b,c").unwrap(),
        Some(&[2, 2][..]),
    )
    .unwrap();

    for rank in 0..4 {
        let record = export(&fill(&dist, rank), &dist, rank).unwrap();
        save_dnpy(rank_file_name(prefix, rank), &record).unwrap();
    }

    for rank in 0..4 {
        let record = load_dnpy(rank_file_name(prefix, rank)).unwrap();
        let (loaded, chunk) = import(record, &comm.with_rank(rank).unwrap()).unwrap();
        assert!(loaded.is_compatible(&dist), "rank {rank} layout differs");
        assert_eq!(loaded, dist);
        assert_eq!(chunk, fill(&dist, rank), "rank {rank} data differs");
    }
}

#[test]
fn test_padded_layout_survives_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("halo_1.dnpy");

    let comm = FixedComm::root(3);
    let dist = Distribution::from_shape(
        &comm,
        &[12, 2],
        &DistSpec::parse_seq("bp:1:periodic,n").unwrap(),
        None,
    )
    .unwrap();
    let chunk = fill(&dist, 1);
    assert_eq!(chunk.shape(), &[6, 2]);

    save_dnpy(&path, &export(&chunk, &dist, 1).unwrap()).unwrap();
    let record = load_dnpy(&path).unwrap();
    assert_eq!(record.dim_data[0].padding(), (1, 1));
    assert!(record.dim_data[0].periodic);

    let (loaded, back) = import(record, &comm.with_rank(1).unwrap()).unwrap();
    assert_eq!(loaded.dist(), dist.dist());
    assert_eq!(loaded.local_shape(1), dist.local_shape(1));
    assert_eq!(back, chunk);
}

#[test]
fn test_unsupported_version_leaves_file_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("v2.dnpy");

    let comm = FixedComm::root(2);
    let dist = Distribution::from_shape(&comm, &[4], &DistSpec::default(), None).unwrap();
    let record = export(&fill(&dist, 0), &dist, 0).unwrap();

    let mut file = File::create(&path).unwrap();
    let err = write_local_array(&mut file, &record, FormatVersion::new(2, 0)).unwrap_err();
    assert!(matches!(err, Error::Configuration(_)));
    file.flush().unwrap();
    assert_eq!(fs::metadata(&path).unwrap().len(), 0);
}

#[test]
fn test_corrupted_and_truncated_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data_0.dnpy");

    let comm = FixedComm::root(2);
    let dist = Distribution::from_shape(&comm, &[8], &DistSpec::default(), None).unwrap();
    save_dnpy(&path, &export(&fill(&dist, 0), &dist, 0).unwrap()).unwrap();
    let good = fs::read(&path).unwrap();

    let mut corrupt = good.clone();
    corrupt[3] ^= 0xff;
    fs::write(&path, &corrupt).unwrap();
    assert!(matches!(load_dnpy(&path), Err(Error::Format(_))));

    fs::write(&path, &good[..good.len() - 5]).unwrap();
    assert!(matches!(
        load_dnpy(&path),
        Err(Error::EndOfStream { what: "array data", .. })
    ));

    assert!(matches!(
        load_dnpy(dir.path().join("missing.dnpy")),
        Err(Error::Io(_))
    ));
}
