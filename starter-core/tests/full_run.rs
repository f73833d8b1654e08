use starter_core::schedule::{FIVE_MINUTE, QUICK_TEST, ScheduleTable, SoundKind};
use starter_core::telemetry::TelemetryEventKind;
use starter_core::{
    ManualClock, PollOutcome, Relay, SequencerConfig, StartSequencer, SystemState,
    TelemetryRecorder,
};

const POLL_MS: u64 = 10;

#[derive(Default)]
struct TraceRelay {
    active: bool,
    activations: u32,
    /// Activations that arrived while the relay was already closed.
    reasserted: u32,
}

impl Relay for TraceRelay {
    fn activate(&mut self) {
        if self.active {
            self.reasserted += 1;
        }
        self.active = true;
        self.activations += 1;
    }

    fn deactivate(&mut self) {
        self.active = false;
    }
}

#[derive(Debug, Eq, PartialEq)]
struct Edge {
    at_ms: u64,
    kind: SoundKind,
    on: bool,
}

struct Run {
    edges: Vec<Edge>,
    completed_at: Option<u64>,
    telemetry: TelemetryRecorder,
    horn: TraceRelay,
    beep: TraceRelay,
}

/// Polls a full run every `POLL_MS` until `until_ms`, logging relay edges.
fn run(table: &'static ScheduleTable, config: SequencerConfig, until_ms: u64) -> Run {
    let clock = ManualClock::new(0);
    let mut state = SystemState::with_schedule(&clock, table.schedule().unwrap());
    let mut telemetry = TelemetryRecorder::new();
    let mut sequencer =
        StartSequencer::with_config(TraceRelay::default(), TraceRelay::default(), config);

    sequencer.start(&mut state, &mut telemetry).unwrap();

    let mut edges = Vec::new();
    let mut completed_at = None;
    let mut last = (false, false);
    loop {
        let now = state.now_ms();
        let outcome = sequencer.poll(&mut state, &mut telemetry).unwrap();
        if outcome == PollOutcome::Completed {
            assert!(completed_at.is_none(), "sequence completed twice");
            completed_at = Some(now);
        }

        let current = (sequencer.horn().active, sequencer.beep().active);
        assert_eq!(current, (state.is_horn_on(), state.is_beep_on()));
        if current.0 != last.0 {
            edges.push(Edge {
                at_ms: now,
                kind: SoundKind::Horn,
                on: current.0,
            });
        }
        if current.1 != last.1 {
            edges.push(Edge {
                at_ms: now,
                kind: SoundKind::Beep,
                on: current.1,
            });
        }
        last = current;

        if now >= until_ms {
            break;
        }
        clock.advance(POLL_MS);
    }

    let (horn, beep) = sequencer.into_relays();
    Run {
        edges,
        completed_at,
        telemetry,
        horn,
        beep,
    }
}

#[test]
fn quick_test_fires_beeps_then_horn() {
    let result = run(&QUICK_TEST, SequencerConfig::default(), 12_000);

    let edge = |at_ms, kind, on| Edge { at_ms, kind, on };
    assert_eq!(
        result.edges,
        vec![
            edge(0, SoundKind::Beep, true),
            edge(300, SoundKind::Beep, false),
            edge(5_000, SoundKind::Beep, true),
            edge(5_300, SoundKind::Beep, false),
            edge(10_000, SoundKind::Horn, true),
            edge(11_000, SoundKind::Horn, false),
        ]
    );
    assert_eq!(result.completed_at, Some(10_000));
}

#[test]
fn horn_outlives_the_completed_timer() {
    let result = run(&QUICK_TEST, SequencerConfig::new(2_500, 100), 13_000);

    let horn_off = result
        .edges
        .iter()
        .find(|edge| edge.kind == SoundKind::Horn && !edge.on)
        .expect("horn should be released");
    assert_eq!(horn_off.at_ms, 12_500);
    assert_eq!(result.completed_at, Some(10_000));
}

#[test]
fn five_minute_sequence_sounds_every_signal_once() {
    let result = run(&FIVE_MINUTE, SequencerConfig::default(), 305_000);

    let count = |kind| {
        result
            .edges
            .iter()
            .filter(|edge| edge.kind == kind && edge.on)
            .count()
    };
    assert_eq!(count(SoundKind::Horn), 4);
    assert_eq!(count(SoundKind::Beep), 12);
    assert_eq!(result.completed_at, Some(303_000));

    let horn_starts: Vec<u64> = result
        .edges
        .iter()
        .filter(|edge| edge.kind == SoundKind::Horn && edge.on)
        .map(|edge| edge.at_ms)
        .collect();
    assert_eq!(horn_starts, vec![3_000, 63_000, 243_000, 303_000]);
}

#[test]
fn telemetry_tells_the_same_story() {
    let result = run(&QUICK_TEST, SequencerConfig::default(), 12_000);

    let events: Vec<TelemetryEventKind> = result
        .telemetry
        .oldest_first()
        .map(|record| record.event)
        .collect();
    assert_eq!(
        events,
        vec![
            TelemetryEventKind::TimerStarted,
            TelemetryEventKind::SoundStarted(SoundKind::Beep),
            TelemetryEventKind::SoundStopped(SoundKind::Beep),
            TelemetryEventKind::SoundStarted(SoundKind::Beep),
            TelemetryEventKind::SoundStopped(SoundKind::Beep),
            TelemetryEventKind::SoundStarted(SoundKind::Horn),
            TelemetryEventKind::SequenceComplete,
            TelemetryEventKind::SoundStopped(SoundKind::Horn),
        ]
    );

    let unseen: Vec<u32> = result.telemetry.since(6).map(|record| record.id).collect();
    assert_eq!(unseen, vec![6, 7]);
}

#[test]
fn beep_longer_than_its_spacing_restarts_each_signal() {
    let result = run(&FIVE_MINUTE, SequencerConfig::new(1_000, 1_500), 4_000);

    assert_eq!(result.beep.activations, 3);
    assert_eq!(result.beep.reasserted, 0);
    assert_eq!(result.horn.activations, 1);

    let count = |event| {
        result
            .telemetry
            .oldest_first()
            .filter(|record| record.event == event)
            .count()
    };
    assert_eq!(count(TelemetryEventKind::SoundStarted(SoundKind::Beep)), 3);
    assert!(count(TelemetryEventKind::SoundStopped(SoundKind::Beep)) >= 2);
}

#[test]
fn stop_lets_a_closed_relay_finish() {
    let clock = ManualClock::new(0);
    let mut state = SystemState::with_schedule(&clock, QUICK_TEST.schedule().unwrap());
    let mut telemetry = TelemetryRecorder::<16>::new();
    let mut sequencer = StartSequencer::new(TraceRelay::default(), TraceRelay::default());

    sequencer.start(&mut state, &mut telemetry).unwrap();
    sequencer.poll(&mut state, &mut telemetry).unwrap();
    assert!(sequencer.beep().active);

    clock.advance(100);
    sequencer.stop(&mut state, &mut telemetry);
    assert!(!state.is_timer_running());
    assert!(sequencer.beep().active);

    while state.now_ms() < 290 {
        clock.advance(POLL_MS);
        assert_eq!(
            sequencer.poll(&mut state, &mut telemetry),
            Ok(PollOutcome::Idle)
        );
    }
    assert!(sequencer.beep().active);
    assert!(state.is_beep_on());

    clock.advance(POLL_MS);
    assert_eq!(
        sequencer.poll(&mut state, &mut telemetry),
        Ok(PollOutcome::Idle)
    );
    assert!(!sequencer.beep().active);
    assert!(!state.is_beep_on());
    assert_eq!(sequencer.beep().activations, 1);
    assert_eq!(
        telemetry.latest().unwrap().event,
        TelemetryEventKind::SoundStopped(SoundKind::Beep)
    );
}
