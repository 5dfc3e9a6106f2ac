use perch_core::AggregatedRules;

/// Exact free-text marker meaning "no actionable feedback".
///
/// Matching is case-sensitive after trimming; near-misses like `"Lgtm!"`
/// are treated as actionable review text.
pub const NO_ISSUES_SENTINEL: &str = "LGTM!";

const TASK_INSTRUCTION: &str = "\
**Your Task:**
Review the provided code diff based on ALL the rules above (global and both \
sets of repository-specific rules). Identify any logical flaws, security \
vulnerabilities, or style violations. Provide your feedback as a series of \
concise comments. If there are no issues, respond with \"LGTM!\".";

/// Build the single review prompt sent to the model.
///
/// Four labeled sections in fixed order: global rules, central
/// repo-specific rules (or placeholder), local repo-specific rules (or
/// placeholder), and the diff, followed by the task instruction block.
/// Immutable once built.
///
/// # Examples
///
/// ```
/// use perch_core::{AggregatedRules, RuleDocument, RuleProvenance};
/// use perch_review::prompt::build_review_prompt;
///
/// let rules = AggregatedRules {
///     global: "No secrets in code.".into(),
///     central: RuleDocument::absent(RuleProvenance::Central),
///     local: RuleDocument::absent(RuleProvenance::Local),
/// };
/// let prompt = build_review_prompt(&rules, "+console.log('x')");
/// assert!(prompt.contains("No secrets in code."));
/// assert!(prompt.contains("+console.log('x')"));
/// ```
pub fn build_review_prompt(rules: &AggregatedRules, diff: &str) -> String {
    format!(
        "**Review Context and Rules:**\n\n{}\n\n\
         **Code Diff to Review:**\n```diff\n{diff}\n```\n\n\
         {TASK_INSTRUCTION}",
        rules.render(),
    )
}

#[cfg(test)]
mod tests {
    use perch_core::{RuleDocument, RuleProvenance, CENTRAL_RULES_PLACEHOLDER};

    use super::*;

    fn rules() -> AggregatedRules {
        AggregatedRules {
            global: "global text".into(),
            central: RuleDocument::absent(RuleProvenance::Central),
            local: RuleDocument::found(RuleProvenance::Local, "local text"),
        }
    }

    #[test]
    fn prompt_contains_all_sections_in_order() {
        let prompt = build_review_prompt(&rules(), "+added line");
        let rules_pos = prompt.find("Review Context and Rules").unwrap();
        let global_pos = prompt.find("global text").unwrap();
        let central_pos = prompt.find(CENTRAL_RULES_PLACEHOLDER).unwrap();
        let local_pos = prompt.find("local text").unwrap();
        let diff_pos = prompt.find("+added line").unwrap();
        let task_pos = prompt.find("Your Task").unwrap();
        assert!(rules_pos < global_pos);
        assert!(global_pos < central_pos);
        assert!(central_pos < local_pos);
        assert!(local_pos < diff_pos);
        assert!(diff_pos < task_pos);
    }

    #[test]
    fn prompt_fences_the_diff() {
        let prompt = build_review_prompt(&rules(), "+x");
        assert!(prompt.contains("```diff\n+x\n```"));
    }

    #[test]
    fn instruction_reserves_the_sentinel() {
        let prompt = build_review_prompt(&rules(), "+x");
        assert!(prompt.contains("respond with \"LGTM!\""));
        assert!(prompt.contains("logical flaws"));
        assert!(prompt.contains("security"));
        assert!(prompt.contains("style violations"));
    }
}
