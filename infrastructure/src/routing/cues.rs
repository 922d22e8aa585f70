//! Cue extraction: keywords and parameter values pulled out of request text.
//!
//! Numeric cues (board, sprint, page ids) are read from the text with quoted
//! segments blanked out, so a quoted name like `'Sprint 7'` never doubles as
//! a sprint id.

use regex::Regex;

pattern!(quoted_re, r#""([^"]+)"|“([^”]+)”|(?:^|[\s(:=])'([^']+)'(?:$|[\s).,;:!?])"#);
pattern!(issue_key_re, r"\b([A-Z][A-Z0-9]+-\d+)\b");
pattern!(project_re, r"(?i)\bproject\s+(?:key\s+)?([A-Za-z][A-Za-z0-9_]*)");
pattern!(space_re, r"(?i)\bspace\s+(?:key\s+)?([A-Za-z0-9~_]+)");
pattern!(board_re, r"(?i)\bboard\s+(?:id\s+)?#?(\d+)");
pattern!(sprint_id_re, r"(?i)\bsprint\s+(?:id\s+)?#?(\d+)\b");
pattern!(page_id_re, r"(?i)\bpage\s+(?:id\s+)?#?(\d+)\b");
pattern!(parent_re, r"(?i)\b(?:under|parent)\s+(?:page\s+)?(?:id\s+)?#?(\d+)\b");
pattern!(repo_re, r"(?:^|[\s(])([A-Za-z0-9][\w.-]*/[\w.-]*\w)");
pattern!(pr_number_re, r"(?i)(?:#|\bpr\s*#?|\bpull\s+request\s+#?)(\d+)\b");
pattern!(time_re, r"(?i)\b(\d+(?:\.\d+)?)\s?([wdhm])\b");
pattern!(priority_re, r"(?i)\b(highest|high|medium|low|lowest)\b");
pattern!(
    issue_type_re,
    r"(?i)\b(?:to|into|as)\s+(?:a\s+|an\s+)?(story|bug|task|epic|sub-task|subtask)\b"
);
pattern!(link_re, r"(?i)\b(blocks|relates|duplicates|clones)\b");
pattern!(account_re, r"(?i)\bassign\s+\S+\s+to\s+([A-Za-z0-9:_@.-]+)");
pattern!(file_re, r"(?:^|\s)((?:/|\./|~/)\S+)");
pattern!(status_re, r#"(?i)\b(?:to|into|as)\s+["']?([A-Za-z][A-Za-z ]*?)["']?\s*[.!]?$"#);
pattern!(jql_re, r"(?i)\bjql\s*[:=]?\s*(.+)$");
pattern!(
    search_re,
    r"(?i)\b(?:about|for|on|regarding|mentioning)\s+(.+?)\s*[?.!]?$"
);
pattern!(
    search_suffix_re,
    r"(?i)\s+(?:in|on|from)\s+(?:the\s+)?(?:confluence|wiki)\b.*$"
);
pattern!(label_re, r#"(?i)\blabel(?:ed|led)?\s+(?:with\s+)?["']?([\w-]+)"#);
pattern!(owner_re, r"(?i)\b(?:user|org|organization|owner)\s+([A-Za-z0-9-]+)");
pattern!(
    user_re,
    r"(?i)\buser\s+(?:details\s+)?(?:for\s+|of\s+)?([^\s?]+)"
);
pattern!(titled_re, r#"(?i)\b(?:titled|called|named)\s+(?:"([^"]+)"|'([^']+)')"#);

/// Words that can follow `project`/`space` without being a key
const NOT_A_KEY: [&str; 10] = [
    "key", "named", "called", "the", "a", "with", "for", "and", "in", "is",
];

/// Text of a request or sub-request, with lazily derived views
pub struct Cues<'a> {
    text: &'a str,
    lower: String,
    /// `text` with quoted segments blanked out
    unquoted: String,
    words: Vec<String>,
}

impl<'a> Cues<'a> {
    pub fn new(text: &'a str) -> Self {
        let lower = text.to_lowercase();
        let words = lower
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .map(str::to_string)
            .collect();
        let unquoted = quoted_re().replace_all(text, " ").into_owned();
        Self {
            text,
            lower,
            unquoted,
            words,
        }
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    /// Whole-word match, case-insensitive
    pub fn has(&self, word: &str) -> bool {
        self.words.iter().any(|w| w == word)
    }

    pub fn has_any(&self, words: &[&str]) -> bool {
        words.iter().any(|w| self.has(w))
    }

    /// Substring match on the lower-cased text, for multi-word phrases
    pub fn phrase(&self, phrase: &str) -> bool {
        self.lower.contains(phrase)
    }

    /// Matches of `re` against the whole text
    pub fn matches(&self, re: &Regex) -> bool {
        re.is_match(self.text)
    }

    /// Position of the first match of `re`
    pub fn find(&self, re: &Regex) -> Option<usize> {
        re.find(self.text).map(|m| m.start())
    }

    pub fn quoted(&self) -> Vec<&'a str> {
        quoted_re()
            .captures_iter(self.text)
            .filter_map(|c| c.get(1).or(c.get(2)).or(c.get(3)))
            .map(|m| m.as_str().trim())
            .filter(|s| !s.is_empty())
            .collect()
    }

    pub fn first_quoted(&self) -> Option<&'a str> {
        self.quoted().into_iter().next()
    }

    /// Quoted text following `titled`, `called` or `named`
    pub fn titled(&self) -> Option<&'a str> {
        titled_re()
            .captures(self.text)
            .and_then(|c| c.get(1).or(c.get(2)))
            .map(|m| m.as_str().trim())
    }

    pub fn issue_keys(&self) -> Vec<&'a str> {
        issue_key_re()
            .captures_iter(self.text)
            .filter_map(|c| c.get(1))
            .map(|m| m.as_str())
            .collect()
    }

    pub fn issue_key(&self) -> Option<&'a str> {
        self.issue_keys().into_iter().next()
    }

    /// `project DEMO`, or the prefix of the first issue key
    pub fn project_key(&self) -> Option<String> {
        key_after(project_re(), &self.unquoted).or_else(|| {
            self.issue_key()
                .and_then(|k| k.split_once('-'))
                .map(|(project, _)| project.to_string())
        })
    }

    pub fn space_key(&self) -> Option<String> {
        key_after(space_re(), &self.unquoted)
    }

    pub fn board_id(&self) -> Option<i64> {
        number(board_re(), &self.unquoted)
    }

    pub fn sprint_id(&self) -> Option<i64> {
        number(sprint_id_re(), &self.unquoted)
    }

    pub fn page_id(&self) -> Option<String> {
        capture(page_id_re(), &self.unquoted)
    }

    pub fn parent_id(&self) -> Option<String> {
        capture(parent_re(), &self.unquoted)
    }

    /// `owner/name`
    pub fn repo(&self) -> Option<String> {
        capture(repo_re(), &self.unquoted)
            .map(|r| r.trim_end_matches(['.', ',']).to_string())
            .filter(|r| !r.ends_with('/'))
    }

    pub fn pr_number(&self) -> Option<i64> {
        number(pr_number_re(), &self.unquoted)
    }

    /// Jira duration such as `2h` or `30m`
    pub fn time_spent(&self) -> Option<String> {
        time_re()
            .captures(&self.unquoted)
            .map(|c| format!("{}{}", &c[1], c[2].to_lowercase()))
    }

    /// Priority name, capitalized as Jira spells it
    pub fn priority(&self) -> Option<String> {
        capture(priority_re(), &self.unquoted).map(|p| capitalize(&p))
    }

    pub fn issue_type(&self) -> Option<String> {
        capture(issue_type_re(), &self.unquoted).map(|t| match t.to_lowercase().as_str() {
            "subtask" | "sub-task" => "Sub-task".to_string(),
            other => capitalize(other),
        })
    }

    /// Jira link type name for the verb used in the text
    pub fn link_type(&self) -> Option<&'static str> {
        capture(link_re(), &self.unquoted).map(|l| match l.to_lowercase().as_str() {
            "blocks" => "Blocks",
            "duplicates" => "Duplicate",
            "clones" => "Cloners",
            _ => "Relates",
        })
    }

    pub fn account_id(&self) -> Option<String> {
        capture(account_re(), &self.unquoted)
    }

    pub fn file_path(&self) -> Option<String> {
        capture(file_re(), self.text)
    }

    /// Target of `move X to <status>` / `mark X as <status>`
    pub fn status_target(&self) -> Option<String> {
        capture(status_re(), self.text.trim()).filter(|s| !s.trim().is_empty())
    }

    pub fn jql(&self) -> Option<String> {
        capture(jql_re(), self.text)
            .map(|q| q.trim().trim_matches(['"', '\'']).trim().to_string())
            .filter(|q| !q.is_empty())
    }

    /// Search keywords: the first quoted string, else what follows `about`/`for`
    pub fn search_query(&self) -> Option<String> {
        if let Some(q) = self.first_quoted() {
            return Some(q.to_string());
        }
        capture(search_re(), self.text.trim())
            .map(|q| search_suffix_re().replace(&q, "").trim().to_string())
            .filter(|q| !q.is_empty())
    }

    pub fn label(&self) -> Option<String> {
        capture(label_re(), self.text)
    }

    pub fn owner(&self) -> Option<String> {
        capture(owner_re(), &self.unquoted)
    }

    /// Name or email of a Confluence user
    pub fn user(&self) -> Option<String> {
        self.first_quoted()
            .map(str::to_string)
            .or_else(|| capture(user_re(), &self.unquoted))
    }

    /// `open` unless the text asks for closed, merged or all pull requests
    pub fn pr_state(&self) -> &'static str {
        if self.has("all") {
            "all"
        } else if self.has_any(&["closed", "merged"]) {
            "closed"
        } else {
            "open"
        }
    }
}

fn capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
}

fn number(re: &Regex, text: &str) -> Option<i64> {
    capture(re, text).and_then(|n| n.parse().ok())
}

fn key_after(re: &Regex, text: &str) -> Option<String> {
    re.captures_iter(text)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str())
        .find(|k| !NOT_A_KEY.contains(&k.to_lowercase().as_str()))
        .map(str::to_uppercase)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords_are_whole_words() {
        let cues = Cues::new("List backlog tickets for project DEMO");
        assert!(cues.has("backlog"));
        assert!(cues.has("tickets"));
        assert!(!cues.has("ticket"));
        assert!(cues.phrase("backlog tickets"));
    }

    #[test]
    fn test_issue_and_project_keys() {
        let cues = Cues::new("summarize ticket DEMO-5 into a new Confluence page in space TEAM");
        assert_eq!(cues.issue_key(), Some("DEMO-5"));
        assert_eq!(cues.project_key().as_deref(), Some("DEMO"));
        assert_eq!(cues.space_key().as_deref(), Some("TEAM"));

        let cues = Cues::new("list backlog tickets for project demo");
        assert_eq!(cues.project_key().as_deref(), Some("DEMO"));
    }

    #[test]
    fn test_quoted_names_do_not_leak_into_ids() {
        let cues = Cues::new("add DEMO-1 to sprint 'Sprint 7' on board 3");
        assert_eq!(cues.first_quoted(), Some("Sprint 7"));
        assert_eq!(cues.sprint_id(), None);
        assert_eq!(cues.board_id(), Some(3));

        let cues = Cues::new("move DEMO-1 into sprint 42");
        assert_eq!(cues.sprint_id(), Some(42));
    }

    #[test]
    fn test_apostrophes_are_not_quotes() {
        let cues = Cues::new("what's in the sprint 'Sprint 2' on board 1? it's late");
        assert_eq!(cues.quoted(), vec!["Sprint 2"]);
    }

    #[test]
    fn test_repo_and_pull_request() {
        let cues = Cues::new("comment on PR acme/web#12 with the backlog");
        assert_eq!(cues.repo().as_deref(), Some("acme/web"));
        assert_eq!(cues.pr_number(), Some(12));

        let cues = Cues::new("attach /tmp/build.log to DEMO-3");
        assert_eq!(cues.repo(), None);
        assert_eq!(cues.file_path().as_deref(), Some("/tmp/build.log"));
    }

    #[test]
    fn test_status_target() {
        assert_eq!(
            Cues::new("move DEMO-1 to In Progress").status_target().as_deref(),
            Some("In Progress")
        );
        assert_eq!(
            Cues::new("mark DEMO-1 as done.").status_target().as_deref(),
            Some("done")
        );
    }

    #[test]
    fn test_small_value_cues() {
        assert_eq!(Cues::new("log 2h on DEMO-1").time_spent().as_deref(), Some("2h"));
        assert_eq!(
            Cues::new("set priority of DEMO-1 to HIGH").priority().as_deref(),
            Some("High")
        );
        assert_eq!(
            Cues::new("change DEMO-1 into a bug").issue_type().as_deref(),
            Some("Bug")
        );
        assert_eq!(Cues::new("DEMO-1 blocks DEMO-2").link_type(), Some("Blocks"));
        assert_eq!(
            Cues::new("assign DEMO-1 to 5b10ac8d").account_id().as_deref(),
            Some("5b10ac8d")
        );
    }

    #[test]
    fn test_search_query() {
        assert_eq!(
            Cues::new("search confluence for onboarding").search_query().as_deref(),
            Some("onboarding")
        );
        assert_eq!(
            Cues::new("find docs about release process in confluence?")
                .search_query()
                .as_deref(),
            Some("release process")
        );
        assert_eq!(
            Cues::new("search for \"runbook\"").search_query().as_deref(),
            Some("runbook")
        );
    }

    #[test]
    fn test_titled_and_label() {
        let cues = Cues::new("create a page titled 'Release notes' in space TEAM");
        assert_eq!(cues.titled(), Some("Release notes"));
        assert_eq!(
            Cues::new("add label 'ops' to page 12").label().as_deref(),
            Some("ops")
        );
        assert_eq!(Cues::new("show labels for page 12").label(), None);
    }
}
