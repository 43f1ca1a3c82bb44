//! Intent matching: ordered rule table mapping phrases to actions.
//!
//! The table is an explicit, ordered list of (predicate, rule id) entries;
//! the first predicate that matches the lowercased, trimmed phrase wins.
//! Ordering is part of the contract: quick-jump phrases for well-known
//! folders sit strictly before the generic `go to <target>` rule, and the
//! passthrough rule sits last. Overlap resolution is pinned by unit tests.
//!
//! Raw passthrough is a deliberate trust boundary: any phrase that matches
//! no fixed rule and contains none of the forbidden metacharacters is
//! executed verbatim in capture mode. This is an allowlist of "absence of
//! dangerous punctuation", not a command vocabulary allowlist.

use once_cell::sync::Lazy;

use crate::extract::extract_param;
use crate::paths::WellKnownFolder;
use crate::sanitize::contains_forbidden;

/// Fixed command templates the matcher must reproduce exactly.
pub mod vocab {
    /// Directory listing, issued as the follow-up after navigation and
    /// successful file operations.
    pub const LIST_DIR: &str = "dir";
    pub const PROCESS_LIST: &str = "tasklist";
    pub const TASK_MANAGER: &str = "start taskmgr";
    pub const SYSTEM_INFO: &str = "systeminfo | findstr /C:\"Host Name\" /C:\"OS Name\" /C:\"System Type\" /C:\"Total Physical Memory\"";
    pub const MEMORY_USAGE: &str = "wmic OS get FreePhysicalMemory,TotalVisibleMemorySize /value";
    pub const DISK_SPACE: &str = "wmic logicaldisk get caption,freespace,size";
    pub const BATTERY_STATUS: &str = "wmic path Win32_Battery get EstimatedChargeRemaining,Status";
    pub const NETWORK_INFO: &str = "ipconfig /all";
    pub const CALCULATOR: &str = "start calc";
    pub const NOTEPAD: &str = "start notepad";
    pub const PAINT: &str = "start mspaint";
    pub const TIME_QUERY: &str = "time /t";
    pub const DATE_QUERY: &str = "date /t";
    /// No-op acknowledgement for exit phrases; the caller terminates the
    /// session, not this command.
    pub const EXIT_ACK: &str = "echo Exiting...";

    /// Extension appended to created files that carry none.
    pub const DEFAULT_EXTENSION: &str = ".txt";
    /// Executable suffix appended to kill-process targets when absent.
    pub const PROCESS_SUFFIX: &str = ".exe";

    /// Kill template for a (suffix-completed) process image name.
    #[must_use]
    pub fn kill_process(image: &str) -> String {
        format!("taskkill /f /im \"{image}\"")
    }

    /// Open-with-default-application template for an absolute path.
    #[must_use]
    pub fn open_file(path: &str) -> String {
        format!("start \"\" \"{path}\"")
    }
}

/// Help screen printed by the `help` rule.
pub const HELP_TEXT: &str = "\
Available Commands:
  File ops:
    create file <name>           - Create a file (adds .txt if no extension)
    open file <name>             - Open a file with default app
    delete file <name>           - Delete a file (with confirmation)
    rename <old> to <new>        - Rename a file or folder
    move <src> to <dst>          - Move file/folder
    copy <src> to <dst>          - Copy file/folder
  Directory ops:
    list files                   - dir
    show files                   - dir
    create directory <name>      - mkdir
    make folder <name>           - mkdir
    go to desktop/downloads/docs - quick jump
    go to <path or folder>       - change directory if exists
    cd <path>                    - change directory
    go up                        - cd ..
  System info:
    show processes               - tasklist
    kill process <name>          - taskkill /f /im <name>.exe (confirm)
    task manager                 - start taskmgr
    system information           - systeminfo (filtered)
    memory usage                 - wmic OS get FreePhysicalMemory,TotalVisibleMemorySize /value
    disk space                   - wmic logicaldisk get caption,freespace,size
    battery status               - wmic path Win32_Battery get EstimatedChargeRemaining,Status
    network info                 - ipconfig /all
  Apps:
    calculator/notepad/paint     - launch
  Time/date:
    what time is it              - time /t
    what is the date             - date /t
  Misc:
    save log, clear screen, exit
  Raw commands:
    anything else without shell punctuation is passed through verbatim.";

/// Identifier of a matched rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleId {
    Help,
    Exit,
    SaveLog,
    ClearScreen,
    TimeQuery,
    DateQuery,
    ChangeDir,
    GoUp,
    QuickJump(WellKnownFolder),
    GoTo,
    CreateFile,
    OpenFile,
    DeleteFile,
    Rename,
    MoveItem,
    CopyItem,
    ListFiles,
    MakeDir,
    ListProcesses,
    KillProcess,
    TaskManager,
    SystemInfo,
    MemoryUsage,
    DiskSpace,
    BatteryStatus,
    NetworkInfo,
    Calculator,
    Notepad,
    Paint,
    Passthrough,
}

/// One entry in the ordered rule table.
pub struct Rule {
    pub id: RuleId,
    pub matches: fn(&str) -> bool,
}

/// The ordered rule table. First match wins; later entries are unreachable
/// for phrases already claimed by earlier predicates.
pub static RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    use RuleId::*;
    vec![
        Rule { id: Help, matches: |v| v == "help" },
        Rule {
            id: Exit,
            matches: |v| ["exit", "quit", "close"].iter().any(|k| v.contains(k)),
        },
        Rule { id: SaveLog, matches: |v| v == "save log" },
        Rule { id: ClearScreen, matches: |v| v.starts_with("clear") },
        Rule {
            id: TimeQuery,
            matches: |v| {
                v.contains("what time") || v.contains("current time") || v.contains("show time")
            },
        },
        Rule {
            id: DateQuery,
            matches: |v| {
                v.contains("what date")
                    || v.contains("current date")
                    || v.contains("show date")
                    || v.contains("what is the date")
            },
        },
        Rule { id: ChangeDir, matches: |v| v.starts_with("cd ") },
        Rule {
            id: GoUp,
            matches: |v| v == "go up" || v == "go back",
        },
        // Quick jumps must precede the generic "go to" rule; both predicate
        // families match phrases like "go to downloads".
        Rule {
            id: QuickJump(WellKnownFolder::Desktop),
            matches: |v| v.contains("go to desktop"),
        },
        Rule {
            id: QuickJump(WellKnownFolder::Downloads),
            matches: |v| v.contains("go to downloads"),
        },
        Rule {
            id: QuickJump(WellKnownFolder::Documents),
            matches: |v| v.contains("go to documents") || v.contains("go to docs"),
        },
        Rule { id: GoTo, matches: |v| v.starts_with("go to ") },
        Rule {
            id: CreateFile,
            matches: |v| v.contains("create file") || v.contains("make file"),
        },
        Rule { id: OpenFile, matches: |v| v.contains("open file") },
        Rule {
            id: DeleteFile,
            matches: |v| v.contains("delete file") || v.contains("remove file"),
        },
        Rule { id: Rename, matches: |v| v.starts_with("rename ") },
        Rule { id: MoveItem, matches: |v| v.starts_with("move ") },
        Rule { id: CopyItem, matches: |v| v.starts_with("copy ") },
        Rule {
            id: ListFiles,
            matches: |v| {
                v.contains("list files") || v.contains("show files") || v.contains("list directory")
            },
        },
        Rule {
            id: MakeDir,
            matches: |v| {
                v.contains("create directory")
                    || v.contains("make folder")
                    || v.starts_with("mkdir ")
            },
        },
        Rule {
            id: ListProcesses,
            matches: |v| {
                v.contains("show processes") || v.contains("list processes") || v == "tasklist"
            },
        },
        Rule {
            id: KillProcess,
            matches: |v| v.contains("kill process") || v.contains("terminate process"),
        },
        Rule { id: TaskManager, matches: |v| v.contains("task manager") },
        Rule {
            id: SystemInfo,
            matches: |v| v.contains("system information") || v.contains("system info"),
        },
        Rule {
            id: MemoryUsage,
            matches: |v| v.contains("memory usage") || v.contains("ram usage"),
        },
        Rule {
            id: DiskSpace,
            matches: |v| v.contains("disk space") || v.contains("storage"),
        },
        Rule { id: BatteryStatus, matches: |v| v.contains("battery status") },
        Rule {
            id: NetworkInfo,
            matches: |v| v.contains("network info") || v == "ipconfig",
        },
        Rule {
            id: Calculator,
            matches: |v| v.contains("calculator") || v == "calc",
        },
        Rule { id: Notepad, matches: |v| v.contains("notepad") },
        Rule {
            id: Paint,
            matches: |v| v.contains("paint") || v.contains("mspaint"),
        },
        // Last resort: verbatim passthrough when no dangerous punctuation
        // is present. Phrases carrying forbidden characters fall off the
        // table entirely and are reported as unrecognized.
        Rule {
            id: Passthrough,
            matches: |v| !v.is_empty() && !contains_forbidden(v),
        },
    ]
});

/// A matched phrase: the raw text, the winning rule, and the extracted
/// trailing parameter where the rule takes one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Intent {
    pub phrase: String,
    pub rule: RuleId,
    pub param: Option<String>,
}

/// Returns the first rule whose predicate matches the normalized phrase.
#[must_use]
pub fn match_rule(phrase: &str) -> Option<RuleId> {
    RULES.iter().find(|r| (r.matches)(phrase)).map(|r| r.id)
}

/// Lowercases and trims the raw phrase, matches it against the table, and
/// extracts the rule's parameter. Returns `None` when no rule matches
/// (which, given the passthrough rule, means forbidden characters were
/// present or the phrase was empty).
#[must_use]
pub fn parse(raw: &str) -> Option<Intent> {
    let phrase = raw.trim().to_lowercase();
    let rule = match_rule(&phrase)?;
    let param = rule_param(rule, &phrase);
    Some(Intent { phrase, rule, param })
}

/// Extracts the trailing parameter for rules that carry one.
fn rule_param(rule: RuleId, phrase: &str) -> Option<String> {
    use RuleId::*;
    match rule {
        ChangeDir => tail_after(phrase, "cd "),
        GoTo => tail_after(phrase, "go to "),
        CreateFile => extract_param(phrase, &["create file", "make file"]),
        OpenFile => extract_param(phrase, &["open file"]),
        DeleteFile => extract_param(phrase, &["delete file", "remove file"]),
        Rename => tail_after(phrase, "rename "),
        MoveItem => tail_after(phrase, "move "),
        CopyItem => tail_after(phrase, "copy "),
        MakeDir => extract_param(phrase, &["create directory", "make folder"])
            .or_else(|| tail_after(phrase, "mkdir ")),
        KillProcess => extract_param(phrase, &["kill process", "terminate process"]),
        Passthrough => Some(phrase.to_string()),
        _ => None,
    }
}

fn tail_after(phrase: &str, prefix: &str) -> Option<String> {
    let tail = phrase.strip_prefix(prefix)?.trim().trim_matches('"');
    if tail.is_empty() {
        None
    } else {
        Some(tail.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn rule_for(phrase: &str) -> Option<RuleId> {
        parse(phrase).map(|i| i.rule)
    }

    #[test]
    fn test_help_only_matches_exact() {
        assert_eq!(rule_for("help"), Some(RuleId::Help));
        assert_eq!(rule_for("  HELP  "), Some(RuleId::Help));
        assert_ne!(rule_for("help me list files"), Some(RuleId::Help));
    }

    #[test]
    fn test_exit_phrases() {
        for p in ["exit", "quit", "please close"] {
            assert_eq!(rule_for(p), Some(RuleId::Exit), "{p}");
        }
    }

    #[test]
    fn test_time_and_date() {
        assert_eq!(rule_for("what time is it"), Some(RuleId::TimeQuery));
        assert_eq!(rule_for("show time"), Some(RuleId::TimeQuery));
        assert_eq!(rule_for("what is the date"), Some(RuleId::DateQuery));
        assert_eq!(rule_for("current date"), Some(RuleId::DateQuery));
    }

    #[test]
    fn test_quick_jump_beats_generic_go_to() {
        // Ordering contract: both predicates match these phrases; the
        // quick-jump entries sit earlier in the table and must win.
        assert_eq!(
            rule_for("go to downloads"),
            Some(RuleId::QuickJump(WellKnownFolder::Downloads))
        );
        assert_eq!(
            rule_for("go to desktop"),
            Some(RuleId::QuickJump(WellKnownFolder::Desktop))
        );
        assert_eq!(
            rule_for("go to documents"),
            Some(RuleId::QuickJump(WellKnownFolder::Documents))
        );
        assert_eq!(rule_for("go to projects"), Some(RuleId::GoTo));
    }

    #[test]
    fn test_quick_jump_table_positions() {
        let generic = RULES.iter().position(|r| r.id == RuleId::GoTo).unwrap();
        for folder in [
            WellKnownFolder::Desktop,
            WellKnownFolder::Downloads,
            WellKnownFolder::Documents,
        ] {
            let jump = RULES
                .iter()
                .position(|r| r.id == RuleId::QuickJump(folder))
                .unwrap();
            assert!(jump < generic, "{folder:?} quick jump must precede generic go-to");
        }
    }

    #[test]
    fn test_navigation_params() {
        let i = parse("cd /tmp").unwrap();
        assert_eq!(i.rule, RuleId::ChangeDir);
        assert_eq!(i.param.as_deref(), Some("/tmp"));

        let i = parse("go to \"my folder\"").unwrap();
        assert_eq!(i.rule, RuleId::GoTo);
        assert_eq!(i.param.as_deref(), Some("my folder"));

        assert_eq!(rule_for("go up"), Some(RuleId::GoUp));
        assert_eq!(rule_for("go back"), Some(RuleId::GoUp));
    }

    #[test]
    fn test_file_op_params() {
        let i = parse("create file called notes dot txt").unwrap();
        assert_eq!(i.rule, RuleId::CreateFile);
        assert_eq!(i.param.as_deref(), Some("notes.txt"));

        let i = parse("delete file old.log").unwrap();
        assert_eq!(i.rule, RuleId::DeleteFile);
        assert_eq!(i.param.as_deref(), Some("old.log"));

        let i = parse("rename a.txt to b.txt").unwrap();
        assert_eq!(i.rule, RuleId::Rename);
        assert_eq!(i.param.as_deref(), Some("a.txt to b.txt"));
    }

    #[test]
    fn test_mkdir_variants() {
        let i = parse("create directory backup").unwrap();
        assert_eq!(i.rule, RuleId::MakeDir);
        assert_eq!(i.param.as_deref(), Some("backup"));

        let i = parse("mkdir backup").unwrap();
        assert_eq!(i.rule, RuleId::MakeDir);
        assert_eq!(i.param.as_deref(), Some("backup"));
    }

    #[test]
    fn test_system_vocabulary() {
        assert_eq!(rule_for("show processes"), Some(RuleId::ListProcesses));
        assert_eq!(rule_for("tasklist"), Some(RuleId::ListProcesses));
        assert_eq!(rule_for("task manager"), Some(RuleId::TaskManager));
        assert_eq!(rule_for("system information"), Some(RuleId::SystemInfo));
        assert_eq!(rule_for("memory usage"), Some(RuleId::MemoryUsage));
        assert_eq!(rule_for("disk space"), Some(RuleId::DiskSpace));
        assert_eq!(rule_for("battery status"), Some(RuleId::BatteryStatus));
        assert_eq!(rule_for("network info"), Some(RuleId::NetworkInfo));
        assert_eq!(rule_for("ipconfig"), Some(RuleId::NetworkInfo));
    }

    #[test]
    fn test_kill_process_param() {
        let i = parse("kill process chrome").unwrap();
        assert_eq!(i.rule, RuleId::KillProcess);
        assert_eq!(i.param.as_deref(), Some("chrome"));
    }

    #[test]
    fn test_launchers() {
        assert_eq!(rule_for("open calculator"), Some(RuleId::Calculator));
        assert_eq!(rule_for("calc"), Some(RuleId::Calculator));
        assert_eq!(rule_for("notepad"), Some(RuleId::Notepad));
        assert_eq!(rule_for("paint"), Some(RuleId::Paint));
    }

    #[test]
    fn test_passthrough_without_punctuation() {
        let i = parse("ping localhost").unwrap();
        assert_eq!(i.rule, RuleId::Passthrough);
        assert_eq!(i.param.as_deref(), Some("ping localhost"));
    }

    #[test]
    fn test_forbidden_characters_match_nothing() {
        // A pipe disqualifies passthrough; with no fixed rule matching,
        // the phrase is unrecognized.
        assert_eq!(parse("foo | bar"), None);
        assert_eq!(parse("echo hi > out.txt"), None);
        assert_eq!(parse(""), None);
    }

    #[test]
    fn test_system_info_template_contains_pipe() {
        // The fixed template itself uses a pipe; only spoken phrases are
        // screened for forbidden characters, not the vocabulary.
        assert!(vocab::SYSTEM_INFO.contains('|'));
    }

    #[test]
    fn test_kill_template() {
        assert_eq!(vocab::kill_process("chrome.exe"), "taskkill /f /im \"chrome.exe\"");
    }
}
