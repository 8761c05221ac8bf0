//! Status command - look up the verdict of an earlier submission

use super::{print_json, print_report, CliSink};
use crate::style::*;
use anyhow::Result;
use judge_client::{
    aggregate, CancellationToken, JudgeApi, JudgeClient, JudgeConfig, ResultPoller,
    SubmissionHandle,
};

pub async fn run(
    config: &JudgeConfig,
    sid: String,
    watch: bool,
    json: bool,
    cancel: CancellationToken,
) -> Result<()> {
    let client = JudgeClient::new(config)?;
    let handle = SubmissionHandle::new(sid);

    let payload = if watch {
        if !json {
            print_header("Submission Status");
            print_key_value("Submission", &handle.submission_id);
            eprintln!(
                "{}",
                style_dim("Watching until the judge reports done... (Ctrl+C to stop)")
            );
        }
        let sink = CliSink::default();
        let poller = ResultPoller::new(&client, &sink, config.poll_options());
        let payload = poller.poll(&handle, &cancel).await?;
        eprintln!();
        payload
    } else {
        let payload = client.fetch_result(&handle).await?;
        if !payload.is_done() {
            if json {
                print_json(&payload)?;
            } else {
                print_info(&format!(
                    "Submission {} is still being judged ({:?})",
                    style_cyan(&handle.submission_id),
                    payload.status
                ));
            }
            return Ok(());
        }
        payload
    };

    let score = aggregate(&payload.cases);
    if json {
        print_json(&score)?;
    } else {
        print_report(&score);
    }
    Ok(())
}
