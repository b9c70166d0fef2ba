#![no_main]

use commitscope_graph::prelude::*;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    let parsed = parse_log(text);
    assert_eq!(
        parsed.records.len() + parsed.errors.len(),
        text.lines().filter(|l| !l.trim().is_empty()).count()
    );

    // Whatever parses must lay out and diff without panicking
    if let Ok(mut graph) = CommitGraph::build(parsed.records) {
        let report = graph.layout(&Spacing::default());
        assert_eq!(report.placed + report.unreachable.len(), graph.commit_count());
        let _ = diff_snapshots(&graph, &graph);
    }

    let mut history = HistoryBuffer::new();
    assert!(history.add(text));
    assert!(!history.add(text));
});
