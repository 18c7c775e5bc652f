/// Build the meeting summary prompt around the joined transcript chunks.
pub fn build_summary_prompt(transcript: &str) -> String {
    format!(
        "From the meeting transcript below, create a meeting summary.\n\
The summary should be no longer than half of the original transcript and\n\
should retain all the important information such as facts, details,\n\
problems, questions, and actions needed.\n\
Meeting transcript:\n\
{transcript}"
    )
}
