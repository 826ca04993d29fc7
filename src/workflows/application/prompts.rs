use std::fmt::Write as _;

use super::profile::{CompanyConnection, ProfileSignal};

pub const ANALYST_SYSTEM: &str = "You are a professional job application analyst who excels at identifying both technical requirements and cultural aspects of job opportunities.";

pub const EXTRACTOR_SYSTEM: &str =
    "You identify the hiring company in job postings and answer with its name only.";

pub const WRITER_SYSTEM: &str = "You are a professional cover letter writer who excels at creating engaging, personable letters that stand out while maintaining professionalism.";

const PROFILE_HEADER: &str = "My LinkedIn Profile Data:";
const MAX_RECOMMENDATIONS: usize = 2;

const GUIDELINES: [&str; 11] = [
    "Start with a compelling opening that shows genuine enthusiasm for the company's mission",
    "Share a brief personal story or insight that demonstrates your alignment with their values",
    "Use a warm, conversational tone while maintaining professionalism",
    "Connect your experience to their needs through specific examples, not just listing skills",
    "Show you've done your research by referencing their work",
    "If there are connections at the company, mention your network there (but don't name-drop without permission)",
    "Use endorsements and recommendations from LinkedIn to support your qualifications",
    "Include a thoughtful closing that reinforces your cultural fit",
    "Keep it concise but memorable",
    "Maintain authenticity - let your personality shine through",
    "Focus on impact and results, not just responsibilities",
];

const REMINDERS: [&str; 5] = [
    "This is a conversation starter, not a resume rehash",
    "Show enthusiasm and genuine interest in their mission",
    "Demonstrate cultural fit while highlighting technical expertise",
    "Be authentic and personable",
    "If you have connections at the company, subtly indicate your familiarity with their work culture",
];

pub fn analysis_prompt(job_description: &str) -> String {
    format!(
        "Analyze this job description and provide key requirements and focus areas:\n\n\
         {job_description}\n\n\
         Please format the response as:\n\
         Key Requirements:\n- [requirement 1]\n- [requirement 2]\n...\n\n\
         Focus Areas:\n- [focus area 1]\n- [focus area 2]\n\n\
         Company Culture & Values:\n- [value 1]\n- [value 2]\n...\n\n\
         Unique Opportunities:\n- [opportunity 1]\n- [opportunity 2]\n"
    )
}

pub fn company_name_prompt(job_description: &str) -> String {
    format!(
        "Which company is hiring for the position below? Reply with the company name only, \
         without punctuation, quotes, or any other text.\n\n{job_description}"
    )
}

pub fn cover_letter_prompt(
    job_description: &str,
    resume: &str,
    prior_letter: &str,
    profile: Option<&ProfileSignal>,
    connections: Option<&[CompanyConnection]>,
) -> String {
    let mut prompt = format!(
        "Create an engaging and personable cover letter based on these inputs:\n\n\
         Job Description:\n{job_description}\n\n\
         My Resume:\n{resume}\n\n\
         My Original Cover Letter Style:\n{prior_letter}"
    );
    prompt.push_str(&format_profile_block(profile, connections));

    prompt.push_str("\n\nGuidelines:\n");
    for (index, guideline) in GUIDELINES.iter().enumerate() {
        let _ = writeln!(prompt, "{}. {}", index + 1, guideline);
    }

    prompt.push_str("\nRemember:\n");
    for reminder in REMINDERS {
        let _ = writeln!(prompt, "- {reminder}");
    }

    prompt
}

/// Renders the optional profile signal as prose appended to the cover
/// letter inputs. Empty when no profile signal is available.
pub fn format_profile_block(
    profile: Option<&ProfileSignal>,
    connections: Option<&[CompanyConnection]>,
) -> String {
    let Some(profile) = profile else {
        return String::new();
    };

    let mut block = format!("\n\n{PROFILE_HEADER}");

    if !profile.summary.is_empty() {
        let _ = write!(block, "\nProfessional Summary:\n{}", profile.summary);
    }

    if !profile.experience.is_empty() {
        block.push_str("\n\nRelevant Experience:");
        for exp in &profile.experience {
            let _ = write!(block, "\n- {} at {} ({})", exp.title, exp.company, exp.duration);
            if !exp.description.is_empty() {
                let _ = write!(block, "\n  {}", exp.description);
            }
        }
    }

    if !profile.skills.is_empty() {
        let _ = write!(block, "\n\nKey Skills:\n- {}", profile.skills.join("\n- "));
    }

    if !profile.recommendations.is_empty() {
        block.push_str("\n\nProfessional Recommendations:");
        for rec in profile.recommendations.iter().take(MAX_RECOMMENDATIONS) {
            let _ = write!(block, "\n\"{}\" - {}", rec.text, rec.author);
        }
    }

    if connections.is_some_and(|connections| !connections.is_empty()) {
        block.push_str(
            "\n\nNote: I have professional connections at the company who can speak to the company's culture and values.",
        );
    }

    block
}
