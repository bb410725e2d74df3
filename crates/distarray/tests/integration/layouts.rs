//! Layouts built through the public API and from configuration files.

use std::fs;

use distarray::{
    DistKind, DistSpec, DistType, Distribution, FixedComm, LayoutConfig, Selector,
};

#[test]
fn test_block_rows_over_four_processes() {
    let config = LayoutConfig::new(vec![31, 53], 4);
    let dist = config.distribution().unwrap();

    assert_eq!(dist.grid_shape(), &[4, 1]);
    assert_eq!(dist.dist(), vec![DistType::Block, DistType::None]);
    for row in 0..31 {
        for col in [0, 26, 52] {
            assert_eq!(dist.owning_ranks(&[row, col]).unwrap(), vec![row / 8]);
        }
    }
    assert_eq!(dist.local_shape(3), Some(vec![7, 53]));
}

#[test]
fn test_two_dimensional_grids() {
    let comm = FixedComm::root(4);
    for tokens in ["b,b", "c,c"] {
        let dist = Distribution::from_shape(
            &comm,
            &[3, 5],
            &DistSpec::parse_seq(tokens).unwrap(),
            Some(&[2, 2][..]),
        )
        .unwrap();
        assert_eq!(dist.targets(), &[0, 1, 2, 3]);
        if tokens == "c,c" {
            assert_eq!(dist.owning_ranks(&[2, 4]).unwrap(), vec![0]);
            assert_eq!(dist.owning_ranks(&[1, 3]).unwrap(), vec![3]);
        } else {
            assert_eq!(dist.owning_ranks(&[2, 4]).unwrap(), vec![3]);
            assert_eq!(dist.owning_ranks(&[1, 2]).unwrap(), vec![0]);
        }
    }
}

#[test]
fn test_mixed_kinds_are_compatible_only_with_themselves() {
    let comm = FixedComm::root(4);
    let shape = [8, 8, 8];
    let bcn = Distribution::from_shape(&comm, &shape, &DistSpec::parse_seq("b,c,n").unwrap(), None)
        .unwrap();
    let bcn_again =
        Distribution::from_shape(&comm, &shape, &DistSpec::parse_seq("b,c,n").unwrap(), None)
            .unwrap();
    let cbn = Distribution::from_shape(&comm, &shape, &DistSpec::parse_seq("c,b,n").unwrap(), None)
        .unwrap();

    assert!(bcn.is_compatible(&bcn_again));
    assert!(!bcn.is_compatible(&cbn));
    assert_eq!(bcn.grid_shape(), &[2, 2, 1]);
}

#[test]
fn test_slicing_a_block_vector() {
    let comm = FixedComm::root(4);
    let dist = Distribution::from_shape(&comm, &[15], &DistSpec::default(), None).unwrap();

    let head = dist.slice(&[(0..3).into()]).unwrap();
    assert_eq!(head.targets(), &[0]);
    assert_eq!(head.shape(), vec![3]);

    let whole = dist.slice(&[Selector::Full]).unwrap();
    assert_eq!(whole, dist);
}

#[test]
fn test_slicing_rows_and_a_column() {
    let comm = FixedComm::root(4);
    let dist = Distribution::from_shape(&comm, &[15, 20], &DistSpec::default(), None).unwrap();

    let sliced = dist.slice(&[(3..7).into(), Selector::Index(4)]).unwrap();
    assert_eq!(sliced.shape(), vec![4]);
    assert_eq!(sliced.maps()[0].bounds(), Some(vec![(0, 1), (1, 4)]));
    assert_eq!(sliced.targets(), &[0, 1]);
}

#[test]
fn test_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("layout.json");
    fs::write(
        &path,
        r#"{
            "shape": [12, 9],
            "dist": { "0": "cyclic", "1": { "block_padded": { "halo": 1 } } },
            "grid_shape": [2, 3],
            "comm_size": 6
        }"#,
    )
    .unwrap();

    let config = LayoutConfig::load(&path).unwrap();
    assert_eq!(
        config.dist.kind(1),
        &DistKind::BlockPadded {
            halo: 1,
            periodic: false
        }
    );

    let dist = config.distribution().unwrap();
    assert_eq!(dist.dist(), vec![DistType::Cyclic, DistType::BlockPadded]);
    // Middle column block gets a ghost on each side.
    assert_eq!(dist.local_shape(1), Some(vec![6, 5]));
    assert_eq!(dist.local_shape(0), Some(vec![6, 4]));
}
