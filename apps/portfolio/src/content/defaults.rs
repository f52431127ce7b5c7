use super::{
    ContactSection, ContentRecord, HeroSection, Project, ProjectsSection, Skill, SkillsSection,
};

/// The copy every session starts with.
pub fn default_content() -> ContentRecord {
    ContentRecord {
        hero: HeroSection {
            title: "breaching digital frontiers.".to_string(),
            subtitle: "a cybersecurity intern's portfolio.".to_string(),
            bio: "I'm a passionate cybersecurity enthusiast with a knack for digital forensics \
                  and ethical hacking. Currently navigating the complex world of cyber threats \
                  and defenses. I thrive on challenges, turning vulnerabilities into learning \
                  opportunities."
                .to_string(),
        },
        skills: SkillsSection {
            title: "skill matrix".to_string(),
            description:
                "My arsenal of tools and technologies. Constantly evolving, always improving."
                    .to_string(),
            skillset: vec![
                skill("Penetration Testing", 85, "Offensive Security"),
                skill("Network Security", 90, "Defensive Security"),
                skill("Python (Scapy, Nmap)", 80, "Scripting"),
                skill("Digital Forensics", 75, "Analysis"),
                skill("Wireshark", 95, "Tools"),
                skill("Linux Administration", 85, "Systems"),
            ],
        },
        projects: ProjectsSection {
            title: "project showdown".to_string(),
            description:
                "Engage with my past exploits. Each project is a captured flag in my journey."
                    .to_string(),
            project_list: vec![
                Project {
                    id: "ctf01".to_string(),
                    title: "Challenge 01: The Encrypted Transmission".to_string(),
                    description: "A CTF challenge involving steganography and cryptography."
                        .to_string(),
                    tech: strings(&["Python", "Cryptography", "Steganography"]),
                    details: "Intercepted a seemingly innocuous image file that held an \
                              encrypted message. Used various steganography techniques to \
                              extract the hidden data, then performed frequency analysis to \
                              crack the simple substitution cipher and reveal the flag."
                        .to_string(),
                },
                Project {
                    id: "ctf02".to_string(),
                    title: "Challenge 02: Vulnerable Web App".to_string(),
                    description:
                        "Exploited multiple vulnerabilities in a custom-built web application."
                            .to_string(),
                    tech: strings(&["SQL Injection", "XSS", "Burp Suite"]),
                    details: "Identified and exploited a SQL injection vulnerability to bypass \
                              login. Escalated privileges by leveraging a stored Cross-Site \
                              Scripting (XSS) flaw in the user profile page. Documented all \
                              findings and provided remediation advice."
                        .to_string(),
                },
                Project {
                    id: "ctf03".to_string(),
                    title: "Challenge 03: Malware Analysis".to_string(),
                    description:
                        "Reverse-engineered a simple malware sample in a sandboxed environment."
                            .to_string(),
                    tech: strings(&["Reverse Engineering", "Static Analysis", "Dynamic Analysis"]),
                    details: "Analyzed a malicious executable to understand its behavior. \
                              Performed static analysis to identify suspicious strings and API \
                              calls, then used a debugger in a sandboxed VM for dynamic analysis \
                              to observe its network traffic and file system changes, \
                              ultimately uncovering its command-and-control mechanism."
                        .to_string(),
                },
            ],
        },
        contact: ContactSection {
            title: "establish contact".to_string(),
            description: "Have a challenge, a question, or an opportunity? Send a secure \
                          transmission. Your data is safe with me."
                .to_string(),
        },
    }
}

fn skill(name: &str, level: u8, category: &str) -> Skill {
    Skill {
        name: name.to_string(),
        level,
        category: category.to_string(),
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
