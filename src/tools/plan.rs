//! Deterministic architecture and implementation plan
//!
//! Keyword-driven; no model call is made.

use crate::prompt::DetailLevel;

pub const DEFAULT_STACK: &str = "SvelteKit, Supabase, TailwindCSS";

/// Characters of the idea quoted in the closing line
const IDEA_PREVIEW_CHARS: usize = 100;

const PHASE_TABLE: &[(&str, &str, &str)] = &[
    ("Setup", "SvelteKit", "App structure, routing, SSR patterns"),
    ("Database", "Supabase Backend", "Schema, RLS policies, migrations"),
    ("Auth", "Auth Specialist", "Login flows, session management"),
    ("UI", "Tailwind CSS UI", "Components, responsive design"),
    ("Types", "TypeScript Strict Mode", "Type safety, Zod validation"),
    ("API", "API Designer", "Endpoint design, error handling"),
    ("Testing", "Test Architect", "Unit tests, E2E with Playwright"),
    ("Security", "Security Hardening", "XSS, CSRF, input validation"),
    ("Deploy", "Vercel Deployment", "CI/CD, environment config"),
];

const PHASES: &[(&str, [&str; 4])] = &[
    (
        "Phase 1: Foundation (Day 1-2)",
        [
            "Initialize SvelteKit project with TypeScript",
            "Set up Supabase project and connect",
            "Configure TailwindCSS",
            "Set up authentication flows",
        ],
    ),
    (
        "Phase 2: Core Features (Day 3-5)",
        [
            "Build database schema with RLS",
            "Implement main user flows",
            "Create core UI components",
            "Add API routes",
        ],
    ),
    (
        "Phase 3: Polish & Deploy (Day 6-7)",
        [
            "Add error handling & loading states",
            "Write tests for critical paths",
            "Security review",
            "Deploy to Vercel",
        ],
    ),
];

fn frontend_line(stack: &str) -> &'static str {
    if stack.contains("svelte") {
        "- **Frontend**: SvelteKit (SSR, routing, forms)"
    } else if stack.contains("next") || stack.contains("react") {
        "- **Frontend**: Next.js (App Router)"
    } else {
        "- **Frontend**: SvelteKit (recommended for rapid development)"
    }
}

fn backend_line(stack: &str) -> &'static str {
    if stack.contains("supabase") {
        "- **Backend/DB**: Supabase (Postgres + Auth + Realtime)"
    } else if stack.contains("firebase") {
        "- **Backend/DB**: Firebase (Firestore + Auth)"
    } else {
        "- **Backend/DB**: Supabase (recommended - Postgres + Auth + Realtime)"
    }
}

/// Markdown build plan for `idea`
pub fn build_plan(idea: &str, detail: DetailLevel, tech_preferences: Option<&str>) -> String {
    let stack = tech_preferences
        .filter(|t| !t.trim().is_empty())
        .unwrap_or(DEFAULT_STACK)
        .to_lowercase();

    let mut out = String::from("# Architecture & Implementation Plan\n\n");

    out.push_str("## Recommended Tech Stack\n\n");
    out.push_str(&format!(
        "Based on the idea and {} PRD level, here's the recommended stack:\n\n",
        detail.alias()
    ));
    out.push_str(frontend_line(&stack));
    out.push('\n');
    out.push_str("- **Styling**: TailwindCSS\n");
    out.push_str(backend_line(&stack));
    out.push('\n');
    out.push_str("- **Language**: TypeScript (strict mode)\n");
    out.push_str("- **Deployment**: Vercel\n\n");

    out.push_str("## Skills by Phase\n\n");
    out.push_str("| Phase | Skill | What It Does |\n");
    out.push_str("|-------|-------|-------------|\n");
    for (phase, skill, what) in PHASE_TABLE {
        out.push_str(&format!("| {} | `{}` | {} |\n", phase, skill, what));
    }
    out.push('\n');

    out.push_str("## Implementation Phases\n\n");
    for (title, steps) in PHASES {
        out.push_str(&format!("### {}\n", title));
        for (i, step) in steps.iter().enumerate() {
            out.push_str(&format!("{}. {}\n", i + 1, step));
        }
        out.push('\n');
    }

    let preview: String = idea.chars().take(IDEA_PREVIEW_CHARS).collect();
    out.push_str("---\n\n");
    out.push_str(&format!("**Ready to build?** Start with: \"{}...\"\n", preview));

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_stack() {
        let plan = build_plan("Paste for cats", DetailLevel::Comprehensive, None);
        assert!(plan.starts_with("# Architecture & Implementation Plan"));
        assert!(plan.contains("genius PRD level"));
        assert!(plan.contains("SvelteKit (SSR, routing, forms)"));
        assert!(plan.contains("Supabase (Postgres + Auth + Realtime)"));
        assert!(plan.contains("- **Language**: TypeScript (strict mode)"));
        assert!(plan.contains("- **Deployment**: Vercel"));
    }

    #[test]
    fn test_react_and_firebase_preferences() {
        let plan = build_plan("x", DetailLevel::Quick, Some("React, Firebase"));
        assert!(plan.contains("Next.js (App Router)"));
        assert!(plan.contains("Firebase (Firestore + Auth)"));
    }

    #[test]
    fn test_unknown_preferences_fall_back_to_recommendations() {
        let plan = build_plan("x", DetailLevel::Quick, Some("Elm, Postgres"));
        assert!(plan.contains("SvelteKit (recommended for rapid development)"));
        assert!(plan.contains("Supabase (recommended - Postgres + Auth + Realtime)"));
    }

    #[test]
    fn test_blank_preferences_use_default() {
        let plan = build_plan("x", DetailLevel::Quick, Some("  "));
        assert!(plan.contains("SvelteKit (SSR, routing, forms)"));
    }

    #[test]
    fn test_phases_and_table() {
        let plan = build_plan("x", DetailLevel::Detailed, None);
        assert_eq!(plan.matches("### Phase").count(), 3);
        assert!(plan.contains("| Database | `Supabase Backend` |"));
        assert_eq!(plan.lines().filter(|l| l.starts_with("| ") && l.contains('`')).count(), 9);
    }

    #[test]
    fn test_closing_line_quotes_first_hundred_chars() {
        let idea = "a".repeat(150);
        let plan = build_plan(&idea, DetailLevel::Quick, None);
        let expected = format!("\"{}...\"", "a".repeat(100));
        assert!(plan.trim_end().ends_with(&expected));
    }

    #[test]
    fn test_plan_is_deterministic() {
        assert_eq!(
            build_plan("idea", DetailLevel::Quick, Some("next")),
            build_plan("idea", DetailLevel::Quick, Some("next"))
        );
    }
}
