//! End-to-end runs of the `sulfolib` binary against temp directories.
//!
//! The campaign inputs are small 2x2 tables whose chemistry is known by
//! hand, so every output file can be checked line by line.

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const SULFONYLS: &str = "S_ID,SMILES,Name\n\
                         S1,CS(=O)(=O)Cl,mesyl chloride\n\
                         S2,CCS(=O)(=O)Cl,esyl chloride\n";

const AMINES: &str = "Amine_ID,SMILES,Name\n\
                      A1,CN,methylamine\n\
                      A2,CCN,ethylamine\n";

const DEST_MAP: &str =
    "Well,Sulfonyl chloride #,Amine #,Sulfonyl source well,Amine source well\n\
     A1,1,1,A1,B1\n\
     B1,1,2,A1,B2\n\
     C1,2,1,A2,B1\n\
     D1,2,2,A2,B2\n";

/// Test fixture: temp dir seeded with the campaign input files.
struct Campaign {
    dir: TempDir,
}

impl Campaign {
    fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        fs::write(dir.path().join("sulfonyls.csv"), SULFONYLS).unwrap();
        fs::write(dir.path().join("amines.csv"), AMINES).unwrap();
        fs::write(dir.path().join("dest_map.csv"), DEST_MAP).unwrap();
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn read(&self, name: &str) -> String {
        fs::read_to_string(self.path(name)).unwrap_or_else(|e| panic!("cannot read {name}: {e}"))
    }

    fn sulfolib(&self) -> Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("sulfolib");
        cmd.current_dir(self.dir.path());
        cmd.env_remove("SULFOLIB_LOG");
        cmd.env_remove("SULFOLIB_OUT_BASENAME");
        cmd.env_remove("SULFOLIB_STRICT_IDS");
        cmd
    }

    fn enumerate(&self) -> Command {
        let mut cmd = self.sulfolib();
        cmd.args([
            "enumerate",
            "--sulfonyl-chlorides",
            "sulfonyls.csv",
            "--amines",
            "amines.csv",
        ]);
        cmd
    }

    fn run(&self, dest_map: &str) -> Command {
        let mut cmd = self.sulfolib();
        cmd.args([
            "run",
            "--sulfonyl-chlorides",
            "sulfonyls.csv",
            "--amines",
            "amines.csv",
            "--dest-map",
            dest_map,
        ]);
        cmd
    }
}

#[test]
fn test_enumerate_writes_the_final_products_and_plate_map() {
    let campaign = Campaign::new();

    campaign
        .enumerate()
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Sulfonyl chlorides: 2 | Amines: 2 | Products: 4",
        ))
        .stdout(predicate::str::contains("Wrote library_final_products.csv"))
        .stdout(predicate::str::contains("Wrote library_plate_map_96.csv"));

    let products = campaign.read("library_final_products.csv");
    let lines: Vec<&str> = products.lines().collect();
    assert_eq!(lines.len(), 5);
    assert!(lines[0].starts_with("ProductID,S_ID,Amine_ID,SMILES,Status,MolWt,LogP,TPSA"));
    assert!(lines[1].starts_with("P0001,S1,A1,CS(=O)(=O)NC,OK,"));
    assert!(lines[2].starts_with("P0002,S1,A2,CS(=O)(=O)NCC,OK,"));
    assert!(lines[3].starts_with("P0003,S2,A1,CCS(=O)(=O)NC,OK,"));
    assert!(lines[4].starts_with("P0004,S2,A2,CCS(=O)(=O)NCC,OK,"));

    // column-major: the four products fill column 1 from row A down
    let plate = campaign.read("library_plate_map_96.csv");
    let lines: Vec<&str> = plate.lines().collect();
    assert_eq!(lines[0], "Well,ProductID,ProductSMILES,S_ID,Amine_ID");
    assert_eq!(lines[1], "A1,P0001,CS(=O)(=O)NC,S1,A1");
    assert_eq!(lines[2], "B1,P0002,CS(=O)(=O)NCC,S1,A2");
    assert_eq!(lines[3], "C1,P0003,CCS(=O)(=O)NC,S2,A1");
    assert_eq!(lines[4], "D1,P0004,CCS(=O)(=O)NCC,S2,A2");

    assert!(!campaign.path("library_final_products.sdf").exists());
}

#[test]
fn test_emit_sdf_writes_a_record_per_structured_product() {
    let campaign = Campaign::new();

    campaign
        .enumerate()
        .args(["--emit-sdf", "--out-basename", "run1"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Wrote run1_final_products.sdf (4 records)",
        ));

    let sdf = campaign.read("run1_final_products.sdf");
    assert_eq!(sdf.matches("$$$$").count(), 4);
    assert!(sdf.starts_with("P0001 | S1 x A1\n"));
    assert!(sdf.contains(">  <Well>\nA1\n"));
    assert!(sdf.contains(">  <MolWt>\n"));
}

#[test]
fn test_run_reconciles_the_dispense_map_and_passes_qc() {
    let campaign = Campaign::new();

    campaign
        .run("dest_map.csv")
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote library_final_products.csv"))
        .stdout(predicate::str::contains(
            "Wrote authoritative_plate_map_96.csv",
        ))
        .stdout(predicate::str::contains("Wrote qc_report.txt"));

    let authoritative = campaign.read("authoritative_plate_map_96.csv");
    let lines: Vec<&str> = authoritative.lines().collect();
    assert_eq!(
        lines[0],
        "Well,S_ID,Amine_ID,SulfonylSourceWell,AmineSourceWell,ProductID,SMILES,Status"
    );
    assert_eq!(lines[1], "A1,S1,A1,A1,B1,P0001,CS(=O)(=O)NC,OK");
    assert_eq!(lines[2], "B1,S1,A2,A1,B2,P0002,CS(=O)(=O)NCC,OK");
    assert_eq!(lines[4], "D1,S2,A2,A2,B2,P0004,CCS(=O)(=O)NCC,OK");

    assert_eq!(campaign.read("qc_report.txt"), "Total wells: 4\nMissing SMILES: 0\n");
}

#[test]
fn test_run_exits_one_when_a_dispensed_pair_is_missing() {
    let campaign = Campaign::new();
    // the fifth row points at a sulfonyl the enumeration never had
    fs::write(
        campaign.path("bad_map.csv"),
        format!("{DEST_MAP}E1,3,1,A3,B1\n"),
    )
    .unwrap();

    campaign
        .run("bad_map.csv")
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "check failed: 1 of 5 wells have no structure",
        ));

    // the tables are still written so the failure can be inspected
    let authoritative = campaign.read("authoritative_plate_map_96.csv");
    assert_eq!(authoritative.lines().count(), 6);
    assert_eq!(authoritative.lines().nth(5), Some("E1,,,A3,B1,,,"));

    let qc = campaign.read("qc_report.txt");
    assert!(qc.contains("Total wells: 5"));
    assert!(qc.contains("Missing SMILES: 1"));
    assert!(qc.contains("Missing rows (Well, S_ID, Amine_ID):"));
    assert!(qc.contains("  E1, , "));
}

#[test]
fn test_reconcile_joins_tables_written_by_a_previous_enumeration() {
    let campaign = Campaign::new();
    campaign.enumerate().assert().success();

    campaign
        .sulfolib()
        .args([
            "reconcile",
            "--dest-map",
            "dest_map.csv",
            "--products",
            "library_final_products.csv",
            "--out",
            "merged.csv",
            "--qc",
            "merged_qc.txt",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote merged.csv"))
        .stdout(predicate::str::contains("Wrote merged_qc.txt"));

    let merged = campaign.read("merged.csv");
    assert_eq!(merged.lines().count(), 5);
    assert!(merged.contains("B1,S1,A2,A1,B2,P0002,CS(=O)(=O)NCC,OK"));
    assert_eq!(campaign.read("merged_qc.txt"), "Total wells: 4\nMissing SMILES: 0\n");
}

#[test]
fn test_two_enumerations_produce_identical_files() {
    let campaign = Campaign::new();
    campaign
        .enumerate()
        .args(["--out-basename", "first"])
        .assert()
        .success();
    campaign
        .enumerate()
        .args(["--out-basename", "second"])
        .assert()
        .success();

    assert_eq!(
        campaign.read("first_final_products.csv"),
        campaign.read("second_final_products.csv")
    );
    assert_eq!(
        campaign.read("first_plate_map_96.csv"),
        campaign.read("second_plate_map_96.csv")
    );
}

#[test]
fn test_empty_reagent_list_is_a_configuration_error() {
    let campaign = Campaign::new();
    fs::write(campaign.path("empty.csv"), "Amine_ID,SMILES,Name\n").unwrap();

    campaign
        .sulfolib()
        .args([
            "enumerate",
            "--sulfonyl-chlorides",
            "sulfonyls.csv",
            "--amines",
            "empty.csv",
        ])
        .assert()
        .code(2)
        .stderr(predicate::str::contains(
            "configuration: the amine table has no usable rows",
        ));

    assert!(!campaign.path("library_final_products.csv").exists());
}

#[test]
fn test_strict_ids_rejects_tables_without_the_id_column() {
    let campaign = Campaign::new();
    fs::write(campaign.path("anon.csv"), "SMILES\nCN\nCCN\n").unwrap();

    campaign
        .sulfolib()
        .args([
            "enumerate",
            "--sulfonyl-chlorides",
            "sulfonyls.csv",
            "--amines",
            "anon.csv",
            "--strict-ids",
        ])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Amine_ID"));

    // without the flag the same table gets positional identifiers
    campaign
        .sulfolib()
        .args([
            "enumerate",
            "--sulfonyl-chlorides",
            "sulfonyls.csv",
            "--amines",
            "anon.csv",
        ])
        .assert()
        .success();
    let products = campaign.read("library_final_products.csv");
    assert!(products.contains("P0001,S1,A_000000,CS(=O)(=O)NC,OK,"));
}
