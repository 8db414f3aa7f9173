//! Purpose: Hold top-level CLI command dispatch for `hyperpage`.
//! Exports: `dispatch_command`.
//! Role: Keep `main.rs` focused on parse/bootstrap and delegate command execution.
//! Invariants: One `Pager` per invocation; deletions listed on the command line apply before paging.
//! Invariants: Skipped positions are reported as stderr notices, never on stdout.

use super::*;

use hyperpage::api::{
    Cursor, CursorResult, IndexPage, Pager, index_range, position_arg, positive_arg,
};
use hyperpage::notice::skip_notice;

pub(super) fn dispatch_command(
    command: Command,
    data_file: PathBuf,
    color_mode: ColorMode,
) -> Result<RunOutcome, Error> {
    match command {
        Command::Completion { shell } => {
            let mut cmd = Cli::command();
            clap_complete::aot::generate(shell, &mut cmd, "hyperpage", &mut io::stdout());
            Ok(RunOutcome::ok())
        }
        Command::Version => {
            emit_version_output();
            Ok(RunOutcome::ok())
        }
        Command::Range { page, page_size } => {
            let page = positive_arg("page", page)?;
            let page_size = positive_arg("page_size", page_size)?;
            let (start, end) = index_range(page, page_size);
            emit_json(json!({ "start": start, "end": end }));
            Ok(RunOutcome::ok())
        }
        Command::Page { page, page_size } => {
            let page = positive_arg("page", page)?;
            let page_size = positive_arg("page_size", page_size)?;
            let pager = Pager::new(data_file);
            let rows = pager.get_page(page, page_size)?;
            emit_json(to_json(&rows)?);
            Ok(RunOutcome::ok())
        }
        Command::Hyper { page, page_size } => {
            let page = positive_arg("page", page)?;
            let page_size = positive_arg("page_size", page_size)?;
            let pager = Pager::new(data_file);
            let hyper = pager.get_hyper(page, page_size)?;
            emit_json(to_json(&hyper)?);
            Ok(RunOutcome::ok())
        }
        Command::Index {
            index,
            page_size,
            delete,
        } => {
            let index = index.map(position_arg).transpose()?;
            let page_size = positive_arg("page_size", page_size)?;
            let pager = Pager::new(data_file);
            apply_deletions(&pager, &delete)?;
            let page = pager.get_hyper_index(index, page_size)?;
            emit_skip_notice("index", &pager, &page.skipped, color_mode);
            emit_json(to_json(&page)?);
            Ok(RunOutcome::ok())
        }
        Command::Scan {
            start,
            page_size,
            delete,
        } => {
            let start = position_arg(start)?;
            let page_size = positive_arg("page_size", page_size)?;
            let pager = Pager::new(data_file);
            apply_deletions(&pager, &delete)?;
            let indexed = pager.indexed_dataset()?;
            let mut cursor = Cursor::at(start);
            let mut skipped = Vec::new();
            while let CursorResult::Page(walk) = indexed.next_page(&mut cursor, page_size)? {
                let page = IndexPage::from_walk(walk, page_size);
                skipped.extend_from_slice(&page.skipped);
                emit_json_line(&to_json(&page)?);
            }
            emit_skip_notice("scan", &pager, &skipped, color_mode);
            Ok(RunOutcome::ok())
        }
        Command::Group { by, list } => {
            let pager = Pager::new(data_file);
            let groups = pager.group_by(&by, &list)?;
            emit_json(to_json(&groups)?);
            Ok(RunOutcome::ok())
        }
        Command::Info => {
            let pager = Pager::new(data_file);
            let dataset = pager.dataset()?;
            emit_json(json!({
                "file": pager.path().display().to_string(),
                "rows": dataset.len(),
                "header": dataset.header(),
            }));
            Ok(RunOutcome::ok())
        }
        Command::Serve {
            bind,
            allow_non_loopback,
        } => {
            let config = serve::ServeConfig {
                bind: parse_bind(&bind)?,
                data_file,
                allow_non_loopback,
            };
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .map_err(|err| {
                    Error::new(ErrorKind::Internal)
                        .with_message("failed to start runtime")
                        .with_source(err)
                })?;
            runtime.block_on(serve::serve(config))?;
            Ok(RunOutcome::ok())
        }
    }
}

fn apply_deletions(pager: &Pager, positions: &[i64]) -> Result<(), Error> {
    for &position in positions {
        let position = position_arg(position)?;
        pager.remove(position)?;
    }
    Ok(())
}

fn emit_skip_notice(cmd: &str, pager: &Pager, skipped: &[usize], color_mode: ColorMode) {
    if skipped.is_empty() {
        return;
    }
    let file = pager.path().display().to_string();
    let notice = skip_notice(notice_time_now(), cmd, &file, skipped);
    emit_notice(&notice, color_mode);
}
