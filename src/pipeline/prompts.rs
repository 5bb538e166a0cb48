//! Prompt templates for the three pipeline stages

/// Shared preamble placing the question in a delimited block
const PREAMBLE: &str = "
You are a research planner.

You are working on a project that aims to answer user's questions
using sources found online.

Your answer MUST be technical, using up-to-date information.
Cite facts, data and specific information.

Here is the user input
<USER_INPUT>
{user_input}
</USER_INPUT>
";

const BUILD_QUERIES: &str = "
Your first objective is to build a list of queries
that will be used to find answers to the user's question.

Return 3-5 queries.
";

const RESUME_SEARCH: &str = "
Your objective here is to analyze the web search results and make a synthesis,
emphasising only what is relevant to the user's question.

After your work, another agent will use the synthesis to build the final response,
so keep only useful information. Be concise and clear.

Here are the web search results:
<SEARCH_RESULTS>
{search_results}
</SEARCH_RESULTS>
";

const BUILD_FINAL_RESPONSE: &str = "
Your objective is to develop a final response to the user using
the reports built during the web search.

The response should contain 500-800 words.

Here are the search results:
<SEARCH_RESULTS>
{search_results}
</SEARCH_RESULTS>

Cite your references with numbered tags, e.g. [1], inside each paragraph.
";

const LINE_QUERIES: &str = r#"Create 2-3 specific search queries to answer: "{user_input}"

Examples:
Question: "How do neural networks work?"
Queries:
- neural networks explained
- how neural networks learn
- neural network architecture

Now create queries for: "{user_input}"
Return only the queries, one per line:"#;

fn preamble(user_input: &str) -> String {
    PREAMBLE.replace("{user_input}", user_input)
}

/// Planner prompt asking for 3-5 queries
pub fn build_queries(user_input: &str) -> String {
    preamble(user_input) + BUILD_QUERIES
}

/// Planner prompt asking for 2-3 queries, one per line
pub fn line_queries(user_input: &str) -> String {
    LINE_QUERIES.replace("{user_input}", user_input)
}

/// Summarizer prompt for one source
pub fn resume_search(user_input: &str, search_results: &str) -> String {
    preamble(user_input) + &RESUME_SEARCH.replace("{search_results}", search_results)
}

/// Writer prompt over all condensed sources
pub fn build_final_response(user_input: &str, search_results: &str) -> String {
    preamble(user_input) + &BUILD_FINAL_RESPONSE.replace("{search_results}", search_results)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_is_delimited() {
        let prompt = build_queries("What is photosynthesis?");
        assert!(prompt.contains("<USER_INPUT>\nWhat is photosynthesis?\n</USER_INPUT>"));
        assert!(prompt.contains("Return 3-5 queries."));
    }

    #[test]
    fn test_stage_prompts_share_preamble() {
        let resume = resume_search("q", "page text");
        let fin = build_final_response("q", "[1]\nTitle: t");
        assert!(resume.starts_with(&preamble("q")));
        assert!(fin.starts_with(&preamble("q")));
        assert!(resume.contains("<SEARCH_RESULTS>\npage text\n</SEARCH_RESULTS>"));
        assert!(fin.contains("500-800 words"));
        assert!(fin.contains("e.g. [1]"));
    }

    #[test]
    fn test_search_results_are_not_reinterpolated() {
        // A source containing the placeholder must not pull in the question
        let prompt = resume_search("secret question", "text with {user_input} inside");
        assert!(prompt.contains("text with {user_input} inside"));
    }

    #[test]
    fn test_line_prompt() {
        let prompt = line_queries("rust lifetimes");
        assert_eq!(prompt.matches("rust lifetimes").count(), 2);
    }
}
