use launchpad_core::session::{Session, SessionBase, SessionSet};

pub fn print_session(session: &Session, transient: bool) {
    let suffix = if transient { " [transient, not persisted]" } else { "" };
    println!("Session: {} ({}){}", session.name, session.key, suffix);
    println!("Mode:    {}", session.mode.as_deref().unwrap_or("<unset>"));
    println!("Steps:   {}", describe_steps(session));

    if !session.tags.is_empty() {
        let tags: Vec<String> = session
            .tags
            .iter()
            .map(|tag| format!("{}={}", tag.key, tag.value))
            .collect();
        println!("Tags:    {}", tags.join(", "));
    }
    if let Some(base) = &session.base {
        println!("Base:    {}", describe_base(base));
    }
    if let Some(run_id) = &session.run_id {
        let changed = if session.config_changed_since_run {
            " (config changed since)"
        } else {
            ""
        };
        println!("Last run: {}{}", run_id, changed);
    }

    println!("---");
    print!("{}", session.run_config_yaml);
    if !session.run_config_yaml.is_empty() && !session.run_config_yaml.ends_with('\n') {
        println!();
    }
}

pub fn print_tabs(set: &SessionSet) {
    for session in set.sessions() {
        let marker = if session.key == set.current_key() { "*" } else { " " };
        println!("{} {}  {}", marker, session.key, session.name);
    }
}

fn describe_steps(session: &Session) -> String {
    match &session.step_selection {
        None => format!("{} (all)", session.step_selection_query),
        Some(steps) => steps.join(", "),
    }
}

fn describe_base(base: &SessionBase) -> String {
    match base {
        SessionBase::Preset { name } => format!("preset {}", name),
        SessionBase::PartitionSet {
            partitions_set_name,
            partition_name: Some(partition),
        } => format!("partition {} of {}", partition, partitions_set_name),
        SessionBase::PartitionSet {
            partitions_set_name,
            partition_name: None,
        } => format!("partition set {}", partitions_set_name),
    }
}
