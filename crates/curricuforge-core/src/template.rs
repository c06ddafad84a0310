use std::fmt::Write;

use curricuforge_client::CurriculumRequest;

/// Builds the canned curriculum used when no generation service is reachable.
///
/// The text uses the same markdown subset the service returns, so it renders
/// through [`crate::markdown::format_curriculum`] like a live response.
pub fn template_curriculum(request: &CurriculumRequest) -> String {
    let CurriculumRequest {
        topic,
        level,
        duration_weeks,
        learning_style,
    } = request;

    let mut text = String::new();
    let _ = writeln!(text, "# {topic} Curriculum ({duration_weeks} Weeks)");
    text.push('\n');
    let _ = writeln!(text, "## Student Level: {level}");
    let _ = writeln!(text, "## Learning Style: {learning_style}");
    text.push('\n');

    section(
        &mut text,
        "### Learning Objectives",
        &[
            format!("Understand fundamental concepts of {topic}"),
            "Apply knowledge to practical projects".to_string(),
            format!("Develop proficiency in {topic}"),
        ],
    );

    let _ = writeln!(text, "### Weekly Breakdown");
    text.push('\n');
    for (heading, items) in weekly_breakdown(topic, *duration_weeks) {
        section(&mut text, &heading, &items);
    }

    section(
        &mut text,
        "### Assessment Methods",
        &[
            "Weekly quizzes".to_string(),
            "Practical assignments".to_string(),
            "Peer review".to_string(),
            "Final project".to_string(),
        ],
    );
    section(
        &mut text,
        "### Recommended Resources",
        &[
            "Online courses".to_string(),
            "Books and documentation".to_string(),
            "Community forums".to_string(),
            "Mentorship opportunities".to_string(),
        ],
    );
    section(
        &mut text,
        &format!("### Tips for {learning_style} Learners"),
        &[
            "Customize learning approach based on preferred style".to_string(),
            "Use interactive tools and platforms".to_string(),
            "Engage with community".to_string(),
            "Regular practice and feedback".to_string(),
        ],
    );

    text.truncate(text.trim_end().len());
    text
}

fn weekly_breakdown(topic: &str, weeks: u32) -> Vec<(String, Vec<String>)> {
    vec![
        (
            "#### Week 1-2: Foundations".to_string(),
            vec![
                format!("Introduction to {topic}"),
                "Key concepts and terminology".to_string(),
                "Resources: Online tutorials, documentation".to_string(),
                "Exercises: Practice problems and quizzes".to_string(),
            ],
        ),
        (
            "#### Week 3-4: Core Concepts".to_string(),
            vec![
                "Deep dive into core principles".to_string(),
                "Hands-on projects".to_string(),
                "Resources: Books, video tutorials".to_string(),
                "Exercises: Mini-projects and case studies".to_string(),
            ],
        ),
        (
            format!("#### Week 5-{weeks}: Advanced Topics & Application"),
            vec![
                "Advanced concepts and techniques".to_string(),
                "Real-world applications".to_string(),
                "Resources: Research papers, advanced courses".to_string(),
                "Exercises: Capstone project".to_string(),
            ],
        ),
    ]
}

fn section(text: &mut String, heading: &str, items: &[String]) {
    let _ = writeln!(text, "{heading}");
    for item in items {
        let _ = writeln!(text, "- {item}");
    }
    text.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::{block_count, format_curriculum};
    use curricuforge_client::{LearningStyle, Level};

    fn request() -> CurriculumRequest {
        CurriculumRequest {
            topic: "Python".to_string(),
            level: Level::Beginner,
            duration_weeks: 10,
            learning_style: LearningStyle::Visual,
        }
    }

    #[test]
    fn template_mentions_request_fields() {
        let text = template_curriculum(&request());
        assert!(text.starts_with("# Python Curriculum (10 Weeks)\n\n"));
        assert!(text.contains("## Student Level: beginner\n## Learning Style: visual"));
        assert!(text.contains("#### Week 5-10: Advanced Topics & Application"));
        assert!(text.ends_with("- Regular practice and feedback"));
    }

    #[test]
    fn template_renders_through_formatter() {
        let text = template_curriculum(&request());
        let html = format_curriculum(&text);
        assert!(html.starts_with(
            "<h3>Python Curriculum (10 Weeks)</h3><h4>Student Level: beginner</h4>"
        ));
        assert!(html.contains("<h5>Tips for visual Learners</h5>\n- Customize"));
        assert!(html.contains("<p>#### Week 1-2: Foundations<br>- Introduction to Python"));
        assert_eq!(block_count(&text), 10);
    }
}
