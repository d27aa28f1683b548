pub mod flow;
pub mod handler;
pub mod ml;
pub mod summary;
pub mod timestamp;

pub use flow::{Flow, FlowInfo, FlowRun, FlowRunRecord, StateDetail, StateType};
pub use handler::{HandlerEvent, HandlerResponse};
pub use ml::{
    ExecutionStatus, MlExecution, PipelineExecutionDetail, PipelineExecutionList,
    PipelineExecutionRecord, PipelineSummary,
};
pub use summary::{summarize, FlowRunPolicy, MlExecutionPolicy, RunSummary, SummaryPolicy};
pub use timestamp::TimestampError;

pub const FLOW_ID_PARAM: &str = "id";
pub const PIPELINE_ID_PARAM: &str = "pipeline_id";
