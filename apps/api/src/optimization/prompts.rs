// Prompt text for the document optimization call.
// The composer assembles these around the job description and CV verbatim.

/// Fixed system-level constraint sent with every optimization request.
pub const OPTIMIZE_SYSTEM: &str = "You are a professional CV optimizer. \
    Your task is to strategically optimize the given CV to better match the job description requirements. \
    Focus on: 1) Realigning existing experience to highlight relevant skills, \
    2) Rephrasing accomplishments to match JD keywords, \
    3) Quantifying achievements where possible, \
    4) Maintaining authenticity while maximizing relevance. \
    Do not fabricate experience, but creatively present existing experience in the most favorable light for the target role. \
    IMPORTANT: Return ONLY the optimized CV content without any explanatory text, preamble, \
    or phrases like \"Here is the optimized CV\" or similar. Start directly with the CV content.";

/// Opening of the user message, before the job description.
pub const OPTIMIZE_USER_INTRO: &str = "Please optimize this CV to better match the job description requirements. \
Make it compelling but authentic. Return only the optimized CV content without any explanatory text.";

/// Heading placed above the job description.
pub const JOB_DESCRIPTION_HEADING: &str = "JOB DESCRIPTION:";

/// Heading placed above the extracted CV text.
pub const CURRENT_CV_HEADING: &str = "CURRENT CV:";

/// Closing of the user message, after the CV.
pub const OPTIMIZE_USER_OUTRO: &str = "Provide the optimized CV that maintains the same structure but better aligns with the job requirements. \
Focus on relevant skills, use similar terminology from the JD, and highlight the most pertinent experiences. \
Do not include any explanatory text - return only the CV content.";
