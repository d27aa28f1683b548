use chrono::{DateTime, Utc};
use proptest::prelude::*;
use protocol::{
    summarize, ExecutionStatus, FlowRunPolicy, FlowRunRecord, MlExecutionPolicy,
    PipelineExecutionRecord, StateDetail, StateType,
};

const STATES: [StateType; 9] = [
    StateType::Scheduled,
    StateType::Pending,
    StateType::Running,
    StateType::Completed,
    StateType::Failed,
    StateType::Cancelled,
    StateType::Cancelling,
    StateType::Crashed,
    StateType::Paused,
];

const STATUSES: [ExecutionStatus; 5] = [
    ExecutionStatus::Executing,
    ExecutionStatus::Stopping,
    ExecutionStatus::Stopped,
    ExecutionStatus::Failed,
    ExecutionStatus::Succeeded,
];

fn iso(offset_secs: i64) -> String {
    DateTime::<Utc>::from_timestamp(1_735_689_600 + offset_secs, 0)
        .expect("in range")
        .to_rfc3339()
}

fn flow_record(
    index: usize,
    state: usize,
    offset: i64,
    duration: f64,
    message: Option<String>,
) -> FlowRunRecord {
    let state_type = STATES[state];
    FlowRunRecord {
        id: format!("run-{index}"),
        flow_id: "flow".to_string(),
        flow_name: None,
        name: format!("run-{index}"),
        flow_version: None,
        created: iso(offset),
        updated: iso(offset),
        start_time: None,
        end_time: None,
        state_type,
        state_name: None,
        state: Some(StateDetail {
            state_type: Some(state_type),
            name: None,
            message,
        }),
        total_run_time: duration,
        run_count: None,
        tags: Vec::new(),
    }
}

fn flow_runs() -> impl Strategy<Value = Vec<FlowRunRecord>> {
    prop::collection::vec(
        (
            0..STATES.len(),
            0i64..50,
            0.0f64..10_000.0,
            prop::option::of("[a-c]{1,3}"),
        ),
        0..40,
    )
    .prop_map(|items| {
        items
            .into_iter()
            .enumerate()
            .map(|(index, (state, offset, duration, message))| {
                flow_record(index, state, offset * 3600, duration, message)
            })
            .collect()
    })
}

fn executions() -> impl Strategy<Value = Vec<PipelineExecutionRecord>> {
    prop::collection::vec((0..STATUSES.len(), 0i64..50), 0..40).prop_map(|items| {
        items
            .into_iter()
            .enumerate()
            .map(|(index, (status, offset))| PipelineExecutionRecord {
                pipeline_execution_arn: format!("arn:{index}"),
                start_time: Some(iso(offset * 60)),
                pipeline_execution_status: STATUSES[status],
                pipeline_execution_display_name: None,
                pipeline_execution_description: None,
                pipeline_execution_failure_reason: None,
                pipeline_execution_details: None,
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn status_counts_sum_to_total(records in flow_runs()) {
        let runs = protocol::flow::normalize_flow_runs(records).unwrap();
        let summary = summarize::<FlowRunPolicy>(runs);
        prop_assert_eq!(summary.status_counts.values().sum::<usize>(), summary.total_runs);
    }

    #[test]
    fn success_rate_is_a_percentage(records in flow_runs()) {
        let runs = protocol::flow::normalize_flow_runs(records).unwrap();
        let summary = summarize::<FlowRunPolicy>(runs);
        prop_assert!((0.0..=100.0).contains(&summary.success_rate));
        if summary.total_runs == 0 {
            prop_assert_eq!(summary.success_rate, 0.0);
        }
    }

    #[test]
    fn avg_run_time_is_the_mean(records in flow_runs()) {
        let runs = protocol::flow::normalize_flow_runs(records).unwrap();
        let expected = if runs.is_empty() {
            0.0
        } else {
            runs.iter().map(|run| run.total_run_time).sum::<f64>() / runs.len() as f64
        };
        let summary = summarize::<FlowRunPolicy>(runs);
        let avg = summary.avg_run_time.unwrap();
        prop_assert!((avg - expected).abs() <= 0.005 + 1e-9);
    }

    #[test]
    fn latest_has_the_maximum_created(records in flow_runs()) {
        let runs = protocol::flow::normalize_flow_runs(records).unwrap();
        let max = runs.iter().map(|run| run.created).max();
        let summary = summarize::<FlowRunPolicy>(runs);
        prop_assert_eq!(summary.latest_run.map(|run| run.created), max);
    }

    #[test]
    fn runs_are_a_descending_permutation(records in flow_runs()) {
        let runs = protocol::flow::normalize_flow_runs(records).unwrap();
        let mut input_ids: Vec<_> = runs.iter().map(|run| run.id.clone()).collect();
        let summary = summarize::<FlowRunPolicy>(runs);
        prop_assert!(summary.runs.windows(2).all(|pair| pair[0].created >= pair[1].created));
        let mut output_ids: Vec<_> = summary.runs.iter().map(|run| run.id.clone()).collect();
        input_ids.sort();
        output_ids.sort();
        prop_assert_eq!(input_ids, output_ids);
    }

    #[test]
    fn flow_errors_only_come_from_failed_or_crashed(records in flow_runs()) {
        let runs = protocol::flow::normalize_flow_runs(records).unwrap();
        let failures = runs.iter().filter(|run| run.state_type.is_failure()).count();
        let summary = summarize::<FlowRunPolicy>(runs);
        prop_assert_eq!(summary.error_types.values().sum::<usize>(), failures);
    }

    #[test]
    fn ml_errors_exclude_succeeded(records in executions()) {
        let runs = protocol::ml::normalize_executions(records).unwrap();
        let non_success = runs
            .iter()
            .filter(|run| run.status != ExecutionStatus::Succeeded)
            .count();
        let summary = summarize::<MlExecutionPolicy>(runs);
        prop_assert!(!summary.error_types.contains_key("Succeeded"));
        prop_assert_eq!(summary.error_types.values().sum::<usize>(), non_success);
        prop_assert_eq!(summary.status_counts.values().sum::<usize>(), summary.total_runs);
    }
}
