#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::future::Future;
    use std::pin::Pin;
    use std::task::{Context, Poll};
    use async_trait::async_trait;
    use futures::executor::block_on;
    use futures::join;
    use time::{Duration, OffsetDateTime};
    use uuid::Uuid;
    use crate::directory::{bounded, MemoryMark, PartyDirectory, VoteFailure, VoteMark};
    use crate::flow::{FlowPhase, FlowState, SubmissionFlow, TransitionError};
    use crate::gate::{evaluate, format_mark, parse_mark, read_mark, ClockAnomaly, EligibilityGate, GateChange, GateState};
    use crate::models::{Party, PartyDraft};
    use crate::results::{format_percentage, leader, summarize};
    use crate::validation::{validate_party_draft, ValidationError};

    fn now() -> OffsetDateTime {
        OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap()
    }

    fn party(name: &str, votes: i64) -> Party {
        Party {
            id: Uuid::new_v4(),
            name: name.into(),
            color: "#FF0000".into(),
            symbol: Some("sol".into()),
            slogan: None,
            description: None,
            logo_url: None,
            votes,
            created_at: now(),
        }
    }

    /// Pending once, then ready: lets a second task run while a call is in flight.
    struct YieldNow(bool);

    impl Future for YieldNow {
        type Output = ();

        fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
            if self.0 {
                Poll::Ready(())
            } else {
                self.0 = true;
                cx.waker().wake_by_ref();
                Poll::Pending
            }
        }
    }

    struct FakeDirectory {
        parties: RefCell<Vec<Party>>,
        calls: Cell<usize>,
        fail_with: Option<VoteFailure>,
    }

    impl FakeDirectory {
        fn new(parties: Vec<Party>) -> Self {
            Self { parties: RefCell::new(parties), calls: Cell::new(0), fail_with: None }
        }

        fn failing(parties: Vec<Party>, failure: VoteFailure) -> Self {
            Self { fail_with: Some(failure), ..Self::new(parties) }
        }
    }

    #[async_trait(?Send)]
    impl PartyDirectory for FakeDirectory {
        async fn list_parties(&self) -> Result<Vec<Party>, VoteFailure> {
            Ok(self.parties.borrow().clone())
        }

        async fn increment_vote(&self, party_id: Uuid) -> Result<Party, VoteFailure> {
            self.calls.set(self.calls.get() + 1);
            YieldNow(false).await;
            if let Some(failure) = &self.fail_with {
                return Err(failure.clone());
            }
            let mut parties = self.parties.borrow_mut();
            let party = parties.iter_mut()
                .find(|p| p.id == party_id)
                .ok_or(VoteFailure::NotFound)?;
            party.votes += 1;
            Ok(party.clone())
        }
    }

    async fn vote_once(
        flow: &RefCell<SubmissionFlow>,
        directory: &FakeDirectory,
        mark: &RefCell<MemoryMark>,
        at: OffsetDateTime,
    ) {
        let gate = evaluate(mark.borrow().read(), at);
        let pending = flow.borrow_mut().confirm_vote(gate);
        if let Some(pending) = pending {
            let outcome = directory.increment_vote(pending.party_id()).await;
            flow.borrow_mut().resolve(pending, outcome, &mut *mark.borrow_mut(), at);
        }
    }

    #[test]
    fn test_gate_open_without_mark() {
        assert_eq!(evaluate(None, now()), GateState::Open);
        assert_eq!(EligibilityGate::default().state(), GateState::Open);
    }

    #[test]
    fn test_gate_closed_inside_cooldown() {
        for elapsed_ms in [0, 1, 500, 999, 1_000, 10_000, 12_345, 24_000, 24_999] {
            let last = now() - Duration::milliseconds(elapsed_ms);
            let GateState::Closed { remaining_seconds } = evaluate(Some(last), now()) else {
                panic!("gate should be closed {elapsed_ms}ms after a vote");
            };
            let expected = ((25_000 - elapsed_ms) as f64 / 1_000.0).ceil() as u32;
            assert_eq!(remaining_seconds, expected, "elapsed {elapsed_ms}ms");
            assert!((1..=25).contains(&remaining_seconds));
        }
    }

    #[test]
    fn test_gate_open_after_cooldown() {
        for elapsed in [Duration::seconds(25), Duration::seconds(26), Duration::hours(3)] {
            assert_eq!(evaluate(Some(now() - elapsed), now()), GateState::Open);
        }
    }

    #[test]
    fn test_gate_fails_open_on_future_mark() {
        let last = now() + Duration::seconds(5);
        assert_eq!(evaluate(Some(last), now()), GateState::Open);
        assert_eq!(evaluate(Some(now() + Duration::days(400)), now()), GateState::Open);
    }

    #[test]
    fn test_gate_reopens_exactly_once() {
        let last = now() - Duration::seconds(22);
        let mut gate = EligibilityGate::new(Some(last), now());
        assert_eq!(gate.state(), GateState::Closed { remaining_seconds: 3 });

        let mut reopened = 0;
        for tick in 1..=6 {
            let change = gate.refresh(Some(last), now() + Duration::seconds(tick));
            if change == GateChange::Reopened {
                reopened += 1;
                assert_eq!(tick, 3);
            }
        }
        assert_eq!(reopened, 1);
        assert!(gate.state().is_open());
    }

    #[test]
    fn test_gate_closes_after_vote_recorded() {
        let mut gate = EligibilityGate::default();
        assert_eq!(gate.refresh(Some(now()), now()), GateChange::Closed);
        assert_eq!(gate.state(), GateState::Closed { remaining_seconds: 25 });
        assert_eq!(gate.state().cooldown_progress(), 0);
        assert_eq!(gate.refresh(Some(now()), now() + Duration::seconds(1)), GateChange::Unchanged);
        assert_eq!(gate.state().remaining_seconds(), 24);
    }

    #[test]
    fn test_mark_parsing() {
        let at = now() + Duration::milliseconds(250);
        assert_eq!(parse_mark(&format_mark(at)), Ok(at));
        assert_eq!(parse_mark(" 1700000000000 "), Ok(now()));
        assert!(matches!(parse_mark("yesterday"), Err(ClockAnomaly::Malformed(_))));
        assert!(matches!(parse_mark(""), Err(ClockAnomaly::Malformed(_))));
        assert!(matches!(parse_mark("99999999999999999"), Err(ClockAnomaly::Malformed(_))));
    }

    #[test]
    fn test_malformed_mark_leaves_gate_open() {
        assert_eq!(read_mark(Some("garbage")), None);
        assert_eq!(evaluate(read_mark(Some("garbage")), now()), GateState::Open);
        assert_eq!(evaluate(read_mark(Some("")), now()), GateState::Open);
        assert_eq!(evaluate(read_mark(None), now()), GateState::Open);

        let recent = format_mark(now() - Duration::seconds(10));
        assert_eq!(
            evaluate(read_mark(Some(recent.as_str())), now()),
            GateState::Closed { remaining_seconds: 15 }
        );
    }

    #[test]
    fn test_scenario_fresh_client_vote_succeeds() {
        let p1 = party("Partido del Sol", 4);
        let directory = FakeDirectory::new(vec![p1.clone()]);
        let flow = RefCell::new(SubmissionFlow::new());
        let mark = RefCell::new(MemoryMark::default());

        flow.borrow_mut().select_party(p1.clone()).unwrap();
        block_on(vote_once(&flow, &directory, &mark, now()));

        match flow.borrow().state() {
            FlowState::Succeeded(updated) => assert_eq!(updated.votes, 5),
            other => panic!("unexpected state {other:?}"),
        }
        assert_eq!(mark.borrow().read(), Some(now()));
        assert_eq!(evaluate(mark.borrow().read(), now()), GateState::Closed { remaining_seconds: 25 });
    }

    #[test]
    fn test_scenario_recent_vote_blocks_confirmation() {
        let mark = MemoryMark::at(now() - Duration::seconds(10));
        let gate = evaluate(mark.read(), now());
        assert_eq!(gate, GateState::Closed { remaining_seconds: 15 });

        let mut flow = SubmissionFlow::new();
        flow.select_party(party("Partido del Agua", 0)).unwrap();
        assert!(!flow.can_confirm(gate));
        assert_eq!(flow.confirm_vote(gate), None);
        assert_eq!(flow.phase(), FlowPhase::PartySelected);
    }

    #[test]
    fn test_scenario_deleted_party_keeps_gate_open() {
        let p2 = party("Partido de la Tierra", 2);
        let directory = FakeDirectory::new(vec![]);
        let flow = RefCell::new(SubmissionFlow::new());
        let earlier = now() - Duration::seconds(30);
        let mark = RefCell::new(MemoryMark::at(earlier));
        assert!(evaluate(mark.borrow().read(), now()).is_open());

        flow.borrow_mut().select_party(p2.clone()).unwrap();
        block_on(vote_once(&flow, &directory, &mark, now()));

        assert_eq!(flow.borrow().failure(), Some(&VoteFailure::NotFound));
        assert_eq!(mark.borrow().read(), Some(earlier));
        assert!(evaluate(mark.borrow().read(), now()).is_open());
    }

    #[test]
    fn test_scenario_double_click_issues_one_increment() {
        let p1 = party("Partido del Fuego", 0);
        let directory = FakeDirectory::new(vec![p1.clone()]);
        let flow = RefCell::new(SubmissionFlow::new());
        let mark = RefCell::new(MemoryMark::default());

        flow.borrow_mut().select_party(p1).unwrap();
        block_on(async {
            join!(
                vote_once(&flow, &directory, &mark, now()),
                vote_once(&flow, &directory, &mark, now()),
            )
        });

        assert_eq!(directory.calls.get(), 1);
        assert_eq!(directory.parties.borrow()[0].votes, 1);
        assert_eq!(flow.borrow().phase(), FlowPhase::Succeeded);
    }

    #[test]
    fn test_confirm_ignored_while_submitting() {
        let mut flow = SubmissionFlow::new();
        flow.select_party(party("A", 0)).unwrap();
        assert!(flow.confirm_vote(GateState::Open).is_some());
        assert!(flow.is_submitting());
        assert_eq!(flow.confirm_vote(GateState::Open), None);
        assert_eq!(flow.select_party(party("B", 0)), Err(TransitionError::SelectionLocked(FlowPhase::Submitting)));
        assert_eq!(flow.cancel(), Err(TransitionError::NothingToCancel(FlowPhase::Submitting)));
        flow.reset();
        assert!(flow.is_submitting());
    }

    #[test]
    fn test_reset_after_success_keeps_cooldown() {
        let p1 = party("Partido del Sol", 0);
        let directory = FakeDirectory::new(vec![p1.clone()]);
        let flow = RefCell::new(SubmissionFlow::new());
        let mark = RefCell::new(MemoryMark::default());

        flow.borrow_mut().select_party(p1.clone()).unwrap();
        block_on(vote_once(&flow, &directory, &mark, now()));
        assert_eq!(
            flow.borrow_mut().select_party(p1.clone()),
            Err(TransitionError::SelectionLocked(FlowPhase::Succeeded))
        );

        flow.borrow_mut().reset();
        assert_eq!(flow.borrow().phase(), FlowPhase::Idle);
        assert_eq!(flow.borrow().target(), None);
        assert_eq!(mark.borrow().read(), Some(now()));

        // Back in the booth two seconds later: selectable, but the gate holds.
        let later = now() + Duration::seconds(2);
        flow.borrow_mut().select_party(p1).unwrap();
        block_on(vote_once(&flow, &directory, &mark, later));
        assert_eq!(flow.borrow().phase(), FlowPhase::PartySelected);
        assert_eq!(directory.calls.get(), 1);
    }

    #[test]
    fn test_failure_never_writes_mark() {
        for failure in [
            VoteFailure::NetworkError("timeout".into()),
            VoteFailure::NotFound,
            VoteFailure::ServerRejected("Invalid party ID".into()),
        ] {
            let p = party("A", 0);
            let directory = FakeDirectory::failing(vec![p.clone()], failure.clone());
            let flow = RefCell::new(SubmissionFlow::new());
            let mark = RefCell::new(MemoryMark::default());

            flow.borrow_mut().select_party(p.clone()).unwrap();
            block_on(vote_once(&flow, &directory, &mark, now()));

            assert_eq!(flow.borrow().failure(), Some(&failure));
            assert_eq!(flow.borrow().target(), Some(&p));
            assert_eq!(mark.borrow().read(), None);
            assert_eq!(directory.calls.get(), 1);
        }
    }

    #[test]
    fn test_retry_after_failure() {
        let a = party("A", 0);
        let b = party("B", 0);
        let mut flow = SubmissionFlow::new();
        let mut mark = MemoryMark::default();

        flow.select_party(a.clone()).unwrap();
        let pending = flow.confirm_vote(GateState::Open).unwrap();
        assert!(flow.resolve(pending, Err(VoteFailure::NotFound), &mut mark, now()));
        assert_eq!(flow.phase(), FlowPhase::Failed);

        flow.select_party(b.clone()).unwrap();
        let pending = flow.confirm_vote(GateState::Open).unwrap();
        assert_eq!(pending.party_id(), b.id);
        assert!(flow.resolve(pending, Ok(b.clone()), &mut mark, now()));
        assert_eq!(flow.state(), &FlowState::Succeeded(b));
        assert_eq!(mark.read(), Some(now()));
    }

    #[test]
    fn test_stale_outcome_is_discarded() {
        let a = party("A", 0);
        let mut flow = SubmissionFlow::new();
        let mut mark = MemoryMark::default();

        flow.select_party(a.clone()).unwrap();
        let first = flow.confirm_vote(GateState::Open).unwrap();
        assert!(flow.resolve(first.clone(), Err(VoteFailure::NetworkError("offline".into())), &mut mark, now()));

        flow.select_party(a.clone()).unwrap();
        let second = flow.confirm_vote(GateState::Open).unwrap();
        assert!(!flow.resolve(first, Ok(a.clone()), &mut mark, now()));
        assert!(flow.is_submitting());
        assert_eq!(mark.read(), None);

        assert!(flow.resolve(second, Ok(a), &mut mark, now()));
        assert_eq!(flow.phase(), FlowPhase::Succeeded);
    }

    #[test]
    fn test_cancel_and_selection_rules() {
        let mut flow = SubmissionFlow::new();
        assert_eq!(flow.cancel(), Err(TransitionError::NothingToCancel(FlowPhase::Idle)));

        flow.select_party(party("A", 0)).unwrap();
        assert!(matches!(flow.select_party(party("B", 0)), Err(TransitionError::SelectionLocked(FlowPhase::PartySelected))));
        flow.cancel().unwrap();
        assert_eq!(flow.state(), &FlowState::Idle);
        assert_eq!(flow.target(), None);

        // Selecting under a closed gate is fine; confirming is not.
        let closed = GateState::Closed { remaining_seconds: 7 };
        flow.select_party(party("C", 0)).unwrap();
        assert_eq!(flow.confirm_vote(closed), None);
    }

    #[test]
    fn test_bounded_call_times_out() {
        let timed_out: Result<(), VoteFailure> =
            block_on(bounded(futures::future::pending(), futures::future::ready(())));
        assert!(matches!(timed_out, Err(ref e) if e.is_ambiguous()));

        let answered = block_on(bounded(async { Ok(7) }, futures::future::pending::<()>()));
        assert_eq!(answered, Ok(7));
    }

    #[test]
    fn test_listing_through_directory() {
        let directory = FakeDirectory::new(vec![party("A", 1), party("B", 2)]);
        let parties = block_on(directory.list_parties()).unwrap();
        assert_eq!(parties.len(), 2);
        assert_eq!(directory.calls.get(), 0);
    }

    #[test]
    fn test_party_validation() {
        let draft = PartyDraft { name: "  Partido del Aire ".into(), color: "#3b82f6".into(), ..PartyDraft::default() };
        assert!(validate_party_draft(&draft).is_ok());
        let normalized = draft.normalized();
        assert_eq!(normalized.name, "Partido del Aire");
        assert_eq!(normalized.color, "#3B82F6");

        let empty = PartyDraft { name: "   ".into(), ..PartyDraft::default() };
        assert_eq!(validate_party_draft(&empty), Err(ValidationError::NameRequired));

        for color in ["3B82F6", "#3B82F", "#GGGGGG", "#3B82F6A", ""] {
            let bad = PartyDraft { name: "X".into(), color: color.into(), ..PartyDraft::default() };
            assert!(matches!(validate_party_draft(&bad), Err(ValidationError::InvalidColor(_))), "{color}");
        }

        let bad_logo = PartyDraft { name: "X".into(), logo_url: Some("javascript:alert(1)".into()), ..PartyDraft::default() };
        assert_eq!(validate_party_draft(&bad_logo), Err(ValidationError::InvalidLogoUrl));

        let blank_fields = PartyDraft { name: "X".into(), slogan: Some("  ".into()), ..PartyDraft::default() }.normalized();
        assert_eq!(blank_fields.slogan, None);
    }

    #[test]
    fn test_results_summary() {
        let parties = vec![party("Sol", 3), party("Agua", 1), party("Aire", 0)];
        let summary = summarize(&parties);

        assert_eq!(summary.total_votes, 4);
        assert_eq!(summary.leader.as_ref().map(|p| p.name.as_str()), Some("Sol"));
        assert_eq!(summary.standings[0].percentage, 75.0);
        assert_eq!(format_percentage(summary.standings[1].percentage), "25.0%");
        assert_eq!(summary.standings[2].party.name, "Aire");
    }

    #[test]
    fn test_results_without_votes() {
        let parties = vec![party("Sol", 0), party("Agua", 0)];
        let summary = summarize(&parties);
        assert_eq!(summary.total_votes, 0);
        assert!(summary.leader.is_none());
        assert!(summary.standings.iter().all(|s| s.percentage == 0.0));
        assert_eq!(summary.standings[0].party.name, "Agua");
    }

    #[test]
    fn test_leader_tie_keeps_first() {
        let parties = vec![party("Sol", 2), party("Agua", 2)];
        assert_eq!(leader(&parties).map(|p| p.name.as_str()), Some("Sol"));
        assert_eq!(parties[0].initial(), "S");
    }
}
