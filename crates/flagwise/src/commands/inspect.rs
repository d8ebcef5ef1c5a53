use flagwise_datafile::Datafile;
use std::path::Path;

fn format_summary(datafile: &Datafile) -> String {
    let mut out = format!(
        "Account: {}\nProject: {}\nEnvironment: {}\nSDK key: {}\nRevision: {}\nBot filtering: {}\n\nFlags:",
        datafile.account_id(),
        datafile.project_id(),
        datafile.environment_key(),
        datafile.sdk_key(),
        datafile.revision(),
        datafile.bot_filtering(),
    );

    for flag in datafile.flags() {
        let rules = flag
            .rollout_id()
            .and_then(|id| datafile.rollout(id))
            .map_or(0, |rollout| rollout.experiments.len());
        out.push_str(&format!(
            "\n  {:<24} experiments: {:<3} rollout rules: {:<3} variables: {}",
            flag.key,
            flag.experiment_ids.len(),
            rules,
            flag.variables.len(),
        ));
    }
    out
}

pub fn run(datafile: &Path) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(datafile)?;
    let datafile = Datafile::build(&content)?;
    println!("{}", format_summary(&datafile));
    Ok(())
}
