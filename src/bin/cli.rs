use chrono::{Duration, Local, NaiveDate};
use polars::prelude::{AnyValue, DataFrame};
use std::io::{self, Write};
use taskboard_tool::{
    Priority, TaskBoard, load_board_from_csv, load_board_from_json, save_board_to_csv,
    save_board_to_json,
};

fn days_to_date(days: i32) -> NaiveDate {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
    epoch + Duration::days(days as i64)
}

fn render_df_as_text_table(df: &DataFrame) -> String {
    // Compute column widths
    let columns = df.get_columns();
    let col_names: Vec<String> = columns.iter().map(|c| c.name().to_string()).collect();

    let mut widths: Vec<usize> = col_names.iter().map(|n| n.len()).collect();
    for (ci, col) in columns.iter().enumerate() {
        for row_idx in 0..df.height() {
            if let Ok(ref av) = col.get(row_idx) {
                let s = match av {
                    AnyValue::Null => String::new(),
                    AnyValue::Int32(v) => v.to_string(),
                    AnyValue::Int64(v) => v.to_string(),
                    AnyValue::Boolean(v) => v.to_string(),
                    AnyValue::Date(v) => days_to_date(*v).to_string(),
                    AnyValue::String(s) => s.to_string(),
                    _ => av.to_string(),
                };
                if s.len() > widths[ci] {
                    widths[ci] = s.len();
                }
            }
        }
    }

    // Build horizontal separator
    let mut sep = String::new();
    sep.push('+');
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    // Build output
    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');

    // Header
    out.push('|');
    for (i, name) in col_names.iter().enumerate() {
        out.push(' ');
        out.push_str(name);
        let pad = widths[i] - name.len();
        if pad > 0 { out.push_str(&" ".repeat(pad)); }
        out.push(' ');
        out.push('|');
    }
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');

    // Rows
    for row_idx in 0..df.height() {
        out.push('|');
        for (ci, col) in columns.iter().enumerate() {
            let mut s = String::new();
            if let Ok(ref av) = col.get(row_idx) {
                s = match av {
                    AnyValue::Null => String::new(),
                    AnyValue::Int32(v) => v.to_string(),
                    AnyValue::Int64(v) => v.to_string(),
                    AnyValue::Boolean(v) => v.to_string(),
                    AnyValue::Date(v) => days_to_date(*v).to_string(),
                    AnyValue::String(st) => st.to_string(),
                    _ => av.to_string(),
                };
            }
            out.push(' ');
            out.push_str(&s);
            let pad = widths[ci].saturating_sub(s.len());
            if pad > 0 { out.push_str(&" ".repeat(pad)); }
            out.push(' ');
            out.push('|');
        }
        out.push('\n');
    }

    out.push_str(&sep);
    out.push('\n');
    out
}

fn print_help() {
    println!(
        "Commands:\n  help                               Show this help\n  show                               Show the current board\n  add <id> <title> <YYYY-MM-DD>      Upsert a task\n  delete <id>                        Delete a task\n  done <id>                          Mark a task complete\n  undone <id>                        Mark a task incomplete\n  title <id> <text...>               Set task title (rest of line)\n  category <id> <name>               Set task category\n  priority <id> <high|medium|low>    Set task priority\n  estimate <id> <minutes|none>       Set task estimate in minutes\n  move <id> <YYYY-MM-DD>             Reschedule a task (asks to confirm)\n  workload <YYYY-MM-DD>              Show one day's workload\n  suggest [YYYY-MM-DD]               Rank landing days (default today)\n  redistribute [YYYY-MM-DD]          Spread overdue tasks across the horizon\n                                     (asks to confirm; default today)\n  lowdone                            Complete all low-priority tasks\n                                     (asks to confirm)\n  meta show                          Show board metadata\n  meta name <text...>                Update board name\n  meta desc <text...>                Update board description\n  meta owner <text...>               Update board owner\n  policy show                        Show reschedule policy\n  policy reset                       Reset policy to defaults\n  save <json|csv> <path>             Persist board to disk\n  load <json|csv> <path>             Load board from disk\n  quit|exit                          Exit"
    );
}

fn print_metadata(board: &TaskBoard) {
    let metadata = board.metadata();
    println!("Board name       : {}", metadata.board_name);
    println!("Board description: {}", metadata.board_description);
    println!("Board owner      : {}", metadata.owner);
}

fn print_policy(board: &TaskBoard) {
    let policy = board.policy();
    println!("Horizon days     : {}", policy.horizon_days);
    println!("Max tasks per day: {}", policy.max_tasks_per_day);
    println!("Max hours per day: {}", policy.max_hours_per_day);
    println!("Day full at hours: {}", policy.day_full_hours);
}

fn confirm(prompt: &str) -> bool {
    print!("{} [y/N] ", prompt);
    let _ = io::stdout().flush();
    let mut answer = String::new();
    if io::stdin().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

fn parse_date_arg(input: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d").ok()
}

fn main() {
    let mut board = TaskBoard::new();

    println!("Task Board (CLI) - type 'help' for commands\n");
    println!("{}", render_df_as_text_table(board.dataframe()));

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        if stdin.read_line(&mut line).is_err() {
            break;
        }
        if line.is_empty() {
            // EOF
            break;
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");

        match cmd {
            "help" => {
                print_help();
            }
            "quit" | "exit" => break,
            "show" => {
                println!("{}", render_df_as_text_table(board.dataframe()));
            }
            "add" => {
                let id_s = parts.next();
                let title_s = parts.next();
                let date_s = parts.next();
                match (id_s, title_s, date_s) {
                    (Some(id_s), Some(title), Some(date_s)) => {
                        let id: i32 = match id_s.parse() {
                            Ok(v) => v,
                            Err(_) => {
                                println!("Invalid id");
                                continue;
                            }
                        };
                        let date = match parse_date_arg(date_s) {
                            Some(d) => d,
                            None => {
                                println!("Invalid date (YYYY-MM-DD)");
                                continue;
                            }
                        };
                        match board.upsert_task(id, title, date) {
                            Ok(_) => {
                                println!("Task upserted.");
                                println!("{}", render_df_as_text_table(board.dataframe()));
                            }
                            Err(e) => println!("Error: {}", e),
                        }
                    }
                    _ => {
                        println!("Usage: add <id> <title> <YYYY-MM-DD>");
                    }
                }
            }
            "delete" => {
                let id_s = parts.next();
                match id_s {
                    Some(id_s) => match id_s.parse::<i32>() {
                        Ok(id) => match board.delete_task(id) {
                            Ok(true) => {
                                println!("Deleted task {id}.");
                                println!("{}", render_df_as_text_table(board.dataframe()));
                            }
                            Ok(false) => println!("Task {id} not found."),
                            Err(e) => println!("Error deleting task: {}", e),
                        },
                        Err(_) => println!("Invalid id"),
                    },
                    None => println!("Usage: delete <id>"),
                }
            }
            "done" | "undone" => {
                let id_s = parts.next();
                match id_s {
                    Some(id_s) => {
                        let id: i32 = match id_s.parse() {
                            Ok(v) => v,
                            Err(_) => {
                                println!("Invalid id");
                                continue;
                            }
                        };
                        let completed = cmd == "done";
                        match board.set_task_completed(id, completed) {
                            Ok(_) => println!(
                                "completed set.\n{}",
                                render_df_as_text_table(board.dataframe())
                            ),
                            Err(e) => println!("Error: {}", e),
                        }
                    }
                    None => println!("Usage: {} <id>", cmd),
                }
            }
            "title" => {
                let id_s = parts.next();
                let rest: Vec<&str> = parts.collect();
                match (id_s, !rest.is_empty()) {
                    (Some(id_s), true) => {
                        let id: i32 = match id_s.parse() {
                            Ok(v) => v,
                            Err(_) => {
                                println!("Invalid id");
                                continue;
                            }
                        };
                        let text = rest.join(" ");
                        match board.set_task_title(id, &text) {
                            Ok(_) => println!(
                                "title set.\n{}",
                                render_df_as_text_table(board.dataframe())
                            ),
                            Err(e) => println!("Error: {}", e),
                        }
                    }
                    _ => println!("Usage: title <id> <text...>"),
                }
            }
            "category" => {
                let id_s = parts.next();
                let name = parts.next();
                match (id_s, name) {
                    (Some(id_s), Some(name)) => {
                        let id: i32 = match id_s.parse() {
                            Ok(v) => v,
                            Err(_) => {
                                println!("Invalid id");
                                continue;
                            }
                        };
                        match board.set_task_category(id, name) {
                            Ok(_) => println!(
                                "category set.\n{}",
                                render_df_as_text_table(board.dataframe())
                            ),
                            Err(e) => println!("Error: {}", e),
                        }
                    }
                    _ => println!("Usage: category <id> <name>"),
                }
            }
            "priority" => {
                let id_s = parts.next();
                let val_s = parts.next();
                match (id_s, val_s) {
                    (Some(id_s), Some(val_s)) => {
                        let id: i32 = match id_s.parse() {
                            Ok(v) => v,
                            Err(_) => {
                                println!("Invalid id");
                                continue;
                            }
                        };
                        let priority = match Priority::from_str(val_s) {
                            Some(p) => p,
                            None => {
                                println!("Invalid priority (high|medium|low)");
                                continue;
                            }
                        };
                        match board.set_task_priority(id, priority) {
                            Ok(_) => println!(
                                "priority set.\n{}",
                                render_df_as_text_table(board.dataframe())
                            ),
                            Err(e) => println!("Error: {}", e),
                        }
                    }
                    _ => println!("Usage: priority <id> <high|medium|low>"),
                }
            }
            "estimate" => {
                let id_s = parts.next();
                let val_s = parts.next();
                match (id_s, val_s) {
                    (Some(id_s), Some(val_s)) => {
                        let id: i32 = match id_s.parse() {
                            Ok(v) => v,
                            Err(_) => {
                                println!("Invalid id");
                                continue;
                            }
                        };
                        let minutes = if val_s == "none" {
                            None
                        } else {
                            match val_s.parse::<i64>() {
                                Ok(v) => Some(v),
                                Err(_) => {
                                    println!("Invalid minutes (integer or 'none')");
                                    continue;
                                }
                            }
                        };
                        match board.set_task_estimate(id, minutes) {
                            Ok(_) => println!(
                                "estimate set.\n{}",
                                render_df_as_text_table(board.dataframe())
                            ),
                            Err(e) => println!("Error: {}", e),
                        }
                    }
                    _ => println!("Usage: estimate <id> <minutes|none>"),
                }
            }
            "move" => {
                let id_s = parts.next();
                let date_s = parts.next();
                match (id_s, date_s) {
                    (Some(id_s), Some(date_s)) => {
                        let id: i32 = match id_s.parse() {
                            Ok(v) => v,
                            Err(_) => {
                                println!("Invalid id");
                                continue;
                            }
                        };
                        let date = match parse_date_arg(date_s) {
                            Some(d) => d,
                            None => {
                                println!("Invalid date (YYYY-MM-DD)");
                                continue;
                            }
                        };
                        if !confirm(&format!("Move task {} to {}?", id, date)) {
                            println!("Cancelled.");
                            continue;
                        }
                        match board.reschedule_task(id, date) {
                            Ok(task) => {
                                println!("Task {} moved to {}.", task.id, task.date);
                                println!("{}", render_df_as_text_table(board.dataframe()));
                            }
                            Err(e) => println!("Error: {}", e),
                        }
                    }
                    _ => println!("Usage: move <id> <YYYY-MM-DD>"),
                }
            }
            "workload" => {
                let date_s = parts.next();
                match date_s {
                    Some(date_s) => {
                        let date = match parse_date_arg(date_s) {
                            Some(d) => d,
                            None => {
                                println!("Invalid date (YYYY-MM-DD)");
                                continue;
                            }
                        };
                        match board.workload_for_date(date) {
                            Ok(workload) => {
                                println!(
                                    "Workload for {}: {} ({} tasks, {}h)",
                                    workload.date,
                                    workload.workload.as_str(),
                                    workload.tasks_count,
                                    workload.total_hours
                                );
                                for task in &workload.tasks {
                                    println!(
                                        "  [{}] {} ({}, {}h)",
                                        task.id,
                                        task.title,
                                        task.priority.as_str(),
                                        task.estimated_hours()
                                    );
                                }
                            }
                            Err(e) => println!("Error: {}", e),
                        }
                    }
                    None => println!("Usage: workload <YYYY-MM-DD>"),
                }
            }
            "suggest" => {
                let today = match parts.next() {
                    Some(date_s) => match parse_date_arg(date_s) {
                        Some(d) => d,
                        None => {
                            println!("Invalid date (YYYY-MM-DD)");
                            continue;
                        }
                    },
                    None => Local::now().date_naive(),
                };
                match board.reschedule_suggestions(today) {
                    Ok(suggestions) => {
                        println!("Reschedule suggestions (today = {}):", today);
                        for (rank, suggestion) in suggestions.iter().enumerate() {
                            let workload = &suggestion.workload;
                            println!(
                                "  {}. {} - {} ({} tasks, {}h)",
                                rank + 1,
                                suggestion.display_date,
                                workload.workload.as_str(),
                                workload.tasks_count,
                                workload.total_hours
                            );
                        }
                    }
                    Err(e) => println!("Error: {}", e),
                }
            }
            "redistribute" => {
                let today = match parts.next() {
                    Some(date_s) => match parse_date_arg(date_s) {
                        Some(d) => d,
                        None => {
                            println!("Invalid date (YYYY-MM-DD)");
                            continue;
                        }
                    },
                    None => Local::now().date_naive(),
                };
                if !confirm("Redistribute all overdue tasks?") {
                    println!("Cancelled.");
                    continue;
                }
                match board.redistribute_overdue(today) {
                    Ok(plan) => {
                        println!("Redistributed ({}).", plan.to_cli_summary());
                        if !plan.updates.is_empty() {
                            println!("{}", render_df_as_text_table(board.dataframe()));
                        }
                    }
                    Err(e) => println!("Error: {}", e),
                }
            }
            "lowdone" => {
                if !confirm("Mark all low-priority tasks complete?") {
                    println!("Cancelled.");
                    continue;
                }
                match board.complete_low_priority_tasks() {
                    Ok(0) => println!("No low-priority tasks to complete."),
                    Ok(marked) => {
                        println!("Marked {} low-priority task(s) complete.", marked);
                        println!("{}", render_df_as_text_table(board.dataframe()));
                    }
                    Err(e) => println!("Error: {}", e),
                }
            }
            "meta" => match parts.next() {
                Some("show") | None => print_metadata(&board),
                Some("name") => {
                    let rest: Vec<&str> = parts.collect();
                    if rest.is_empty() {
                        println!("Usage: meta name <text...>");
                        continue;
                    }
                    board.set_board_name(rest.join(" "));
                    println!("Board name updated.");
                    print_metadata(&board);
                }
                Some("desc") => {
                    let rest: Vec<&str> = parts.collect();
                    if rest.is_empty() {
                        println!("Usage: meta desc <text...>");
                        continue;
                    }
                    board.set_board_description(rest.join(" "));
                    println!("Board description updated.");
                    print_metadata(&board);
                }
                Some("owner") => {
                    let rest: Vec<&str> = parts.collect();
                    if rest.is_empty() {
                        println!("Usage: meta owner <text...>");
                        continue;
                    }
                    board.set_owner(rest.join(" "));
                    println!("Board owner updated.");
                    print_metadata(&board);
                }
                Some(other) => {
                    println!("Unknown meta command '{}'.", other);
                    println!("Usage: meta show|name|desc|owner ...");
                }
            },
            "policy" => match parts.next() {
                Some("show") | None => print_policy(&board),
                Some("reset") => {
                    board.reset_policy();
                    println!("Policy reset to defaults.");
                    print_policy(&board);
                }
                Some(other) => {
                    println!("Unknown policy command '{}'.", other);
                    println!("Usage: policy show|reset");
                }
            },
            "save" => {
                let fmt = parts.next();
                let path = parts.next();
                match (fmt, path) {
                    (Some("json"), Some(path)) => match save_board_to_json(&board, path) {
                        Ok(_) => println!("Board saved to {}.", path),
                        Err(e) => println!("Error saving board: {}", e),
                    },
                    (Some("csv"), Some(path)) => match save_board_to_csv(&board, path) {
                        Ok(_) => println!("Board saved to {}.", path),
                        Err(e) => println!("Error saving board: {}", e),
                    },
                    _ => println!("Usage: save <json|csv> <path>"),
                }
            }
            "load" => {
                let fmt = parts.next();
                let path = parts.next();
                match (fmt, path) {
                    (Some("json"), Some(path)) => match load_board_from_json(path) {
                        Ok(loaded) => {
                            board = loaded;
                            println!("Board loaded from {}.", path);
                            println!("{}", render_df_as_text_table(board.dataframe()));
                        }
                        Err(e) => println!("Error loading board: {}", e),
                    },
                    (Some("csv"), Some(path)) => match load_board_from_csv(path) {
                        Ok(loaded) => {
                            board = loaded;
                            println!("Board loaded from {}.", path);
                            println!("{}", render_df_as_text_table(board.dataframe()));
                        }
                        Err(e) => println!("Error loading board: {}", e),
                    },
                    _ => println!("Usage: load <json|csv> <path>"),
                }
            }
            _ => {
                println!("Unknown command. Type 'help'.");
            }
        }
    }
}
