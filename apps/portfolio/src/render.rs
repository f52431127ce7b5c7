//! Content renderer: HTML as a pure function of the active ContentRecord.
//!
//! `render_page` produces the full document; `render_sections` produces only
//! the `<main>` fragment so a client can swap it in after personalization.
//! Every piece of copy is escaped; nothing from the record is trusted as markup.

use crate::content::{ContactSection, ContentRecord, HeroSection, ProjectsSection, SkillsSection};

const SITE_OWNER: &str = "Gurleen Kaur";
pub const PGP_KEY_ROUTE: &str = "/pgp-key.txt";

pub fn render_page(content: &ContentRecord) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{owner} | Portfolio</title>\n</head>\n<body>\n{header}\n{main}\n</body>\n</html>\n",
        owner = escape_html(SITE_OWNER),
        header = render_header(),
        main = render_sections(content),
    )
}

pub fn render_sections(content: &ContentRecord) -> String {
    let mut out = String::from("<main id=\"content\">\n");
    out.push_str(&render_hero(&content.hero));
    out.push_str(&render_skills(&content.skills));
    out.push_str(&render_projects(&content.projects));
    out.push_str(&render_contact(&content.contact));
    out.push_str("</main>");
    out
}

fn render_header() -> String {
    "<header>\n<a href=\"/\" class=\"brand\">Portfolio</a>\n<nav>\n\
     <a href=\"#skills\">/skills</a>\n<a href=\"#projects\">/projects</a>\n\
     <a href=\"#contact\">/contact</a>\n</nav>\n</header>"
        .to_string()
}

fn render_hero(hero: &HeroSection) -> String {
    format!(
        "<section id=\"hero\">\n<h3>{}</h3>\n<h1>{}</h1>\n<h2>{}</h2>\n<p>{}</p>\n</section>\n",
        escape_html(SITE_OWNER),
        escape_html(&hero.title),
        escape_html(&hero.subtitle),
        escape_html(&hero.bio),
    )
}

fn render_skills(skills: &SkillsSection) -> String {
    let mut out = section_heading("skills", &skills.title, &skills.description);
    out.push_str("<ul class=\"skills\">\n");
    for skill in &skills.skillset {
        out.push_str(&format!(
            "<li>\n<h4>{name}</h4>\n<span class=\"category\">{category}</span>\n\
             <meter min=\"0\" max=\"100\" value=\"{level}\">{level}%</meter>\n\
             <p>{level}% proficiency</p>\n</li>\n",
            name = escape_html(&skill.name),
            category = escape_html(&skill.category),
            level = skill.level,
        ));
    }
    out.push_str("</ul>\n</section>\n");
    out
}

fn render_projects(projects: &ProjectsSection) -> String {
    let mut out = section_heading("projects", &projects.title, &projects.description);
    for project in &projects.project_list {
        let tech = project
            .tech
            .iter()
            .map(|t| format!("<li>{}</li>", escape_html(t)))
            .collect::<Vec<_>>()
            .join("");
        out.push_str(&format!(
            "<details id=\"project-{id}\">\n<summary>{title}</summary>\n<p>{description}</p>\n\
             <p>{details}</p>\n<ul class=\"tech\">{tech}</ul>\n</details>\n",
            id = escape_html(&project.id),
            title = escape_html(&project.title),
            description = escape_html(&project.description),
            details = escape_html(&project.details),
            tech = tech,
        ));
    }
    out.push_str("</section>\n");
    out
}

fn render_contact(contact: &ContactSection) -> String {
    let mut out = section_heading("contact", &contact.title, &contact.description);
    out.push_str(&format!(
        "<form id=\"contact-form\" method=\"post\" action=\"/api/contact\">\n\
         <label>Name <input name=\"name\" placeholder=\"Your alias\" minlength=\"2\" required></label>\n\
         <label>Email <input name=\"email\" type=\"email\" placeholder=\"your-secure@email.com\" required></label>\n\
         <label>Message <textarea name=\"message\" placeholder=\"Type your encrypted message here...\" minlength=\"10\" required></textarea></label>\n\
         <button type=\"submit\">Send Transmission</button>\n\
         <a href=\"{PGP_KEY_ROUTE}\" download>Download PGP Key</a>\n</form>\n</section>\n"
    ));
    out
}

fn section_heading(id: &str, title: &str, description: &str) -> String {
    format!(
        "<section id=\"{id}\">\n<h2>{}</h2>\n<p>{}</p>\n",
        escape_html(title),
        escape_html(description),
    )
}

/// Escapes text for use in HTML element content and quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
