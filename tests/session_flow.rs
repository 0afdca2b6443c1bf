use rand::SeedableRng;
use rand::rngs::StdRng;

use goldspinner::ledger::{HEADERS, LedgerClient, LedgerConfig};
use goldspinner::payout::NarrativeFlags;
use goldspinner::session::{SessionError, SessionState};

fn open_session(dir: &tempfile::TempDir) -> SessionState {
    let config = LedgerConfig::at(dir.path().join("Sheet1.jsonl"));
    let client = LedgerClient::connect(&config).expect("store should open in a temp dir");
    SessionState::new(Some(client))
}

#[test]
fn full_session_flow_from_first_spin_to_tier_up() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = open_session(&dir);
    session.refresh_aggregate().unwrap();
    assert_eq!(session.aggregate().job_count, 0);
    assert_eq!(session.cap(), 250);

    // Saving before the first spin is rejected and leaves the store alone.
    let err = session
        .save(12, NarrativeFlags::default(), "too eager")
        .unwrap_err();
    assert!(matches!(err, SessionError::InvalidState));

    let mut rng = StdRng::seed_from_u64(2026);
    let flags = NarrativeFlags {
        good: true,
        ..Default::default()
    };

    let mut expected_total = 0.0;
    for job in 0..5 {
        let spin = session.spin(&mut rng);
        let breakdown = session.compute_payout(18, flags);
        assert_eq!(breakdown.multiplier, spin.multiplier());
        assert!(breakdown.award >= 50 && breakdown.award <= breakdown.cap);

        let record = session
            .save(18, flags, &format!("parlour job {job}"))
            .unwrap();
        assert_eq!(record.final_award_gp, breakdown.award);
        expected_total += record.final_award_gp as f64;
        assert_eq!(session.aggregate().job_count, job + 1);
    }

    // Five completed jobs unlock tier 1 and raise the cap.
    assert_eq!(session.tier(), 1);
    assert_eq!(session.cap(), 275);
    assert_eq!(session.aggregate().total_gold, expected_total);

    // The cap change flows straight into the next preview.
    assert_eq!(session.compute_payout(30, flags).cap, 275);
}

#[test]
fn store_layout_survives_a_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = open_session(&dir);
    let mut rng = StdRng::seed_from_u64(5);
    session.spin(&mut rng);
    session.save(30, NarrativeFlags::default(), "wrap up").unwrap();
    let total = session.aggregate().total_gold;

    // A second session over the same store sees the same history.
    let mut reopened = open_session(&dir);
    reopened.refresh_aggregate().unwrap();
    assert_eq!(reopened.aggregate().job_count, 1);
    assert_eq!(reopened.aggregate().total_gold, total);

    let content = std::fs::read_to_string(dir.path().join("Sheet1.jsonl")).unwrap();
    let mut lines = content.lines();
    let header: Vec<String> = serde_json::from_str(lines.next().unwrap()).unwrap();
    assert_eq!(header, HEADERS);
    let row: Vec<serde_json::Value> = serde_json::from_str(lines.next().unwrap()).unwrap();
    assert_eq!(row.len(), 8);
    assert_eq!(row[1], "wrap up");
    assert_eq!(row[2], 30);
}
