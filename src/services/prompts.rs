//! Prompt 模板

use crate::workflow::SearchCtx;

/// 搜索词解读
pub fn disambiguation_prompt(term: &str) -> String {
    format!(
        r#"I need to find vendors related to "{term}". Please provide 2-3 different interpretations of what this term could refer to
in a business context. For each interpretation, provide a brief description of that interpretation.

Format your response as a JSON array of objects, each with 'interpretation' and 'description' properties:
[
    {{"interpretation": "...", "description": "..."}},
    {{"interpretation": "...", "description": "..."}}
]

Only include the raw JSON in your response, no other text. Do not use Markdown code blocks."#
    )
}

/// 查找供应商名称
pub fn discovery_prompt(term: &str, category: &str, count: usize, ctx: &SearchCtx) -> String {
    let location = ctx.location_phrase("based in");
    let country = ctx.country().unwrap_or_default();

    format!(
        r#"Use web search to find exactly {count} real, existing vendors that are {category}s in the "{term}" industry or category{location}.

Search for actual companies that exist, not fictional ones. Use search queries like:
- "top {category}s for {term} {country}"
- "{term} {category} companies{location}"
- "list of {term} {category} suppliers{location}"

Guidelines:
- Only include real companies that actually exist
- Search for diverse companies (varying sizes, focus areas)
- Use the company's official name
- Ensure names are unique and not duplicated
- Continue searching until you find exactly {count} vendors

Format your response as a JSON array of strings, one for each vendor name:
["Vendor Name 1", "Vendor Name 2", ...]

Only include the raw JSON in your response, no other text. Do not use Markdown code blocks."#
    )
}

/// 调研单个供应商
pub fn research_prompt(name: &str, category: &str, ctx: &SearchCtx) -> String {
    let term = ctx.term.as_str();
    let location = ctx.location_phrase("operating in");

    format!(
        r#"Use web search to find detailed information about "{name}", a real {category} in the "{term}" industry{location}.

Generate a company profile with these fields based on what you find:
- description: A 1-2 sentence company description based on their actual business
- website: The company's actual website URL (if found)
- contact: Real contact information (email and/or phone) if publicly available
- specializations: List of 3-5 specific focus areas or specialties
- relevance_score: A score from 1-10 indicating how relevant this vendor is to "{term}" (10 being highest).
  Use the full range based on how directly their products relate to the term, how specialized they are and their prominence.
- business_type: A specific subtype of "{category}" that best describes their business model

Format your response as a JSON object with these exact field names:
{{
    "description": "...",
    "website": "...",
    "contact": "...",
    "specializations": ["...", "..."],
    "relevance_score": 7,
    "business_type": "..."
}}

Only include the raw JSON in your response, no other text. Do not use Markdown code blocks."#
    )
}
