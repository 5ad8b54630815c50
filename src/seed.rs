//! Demo data: a small user directory, a handful of resolved entries, and
//! the documentation index seed. `navify init` loads these into an empty
//! store so a fresh install has something to search.

use anyhow::Result;
use chrono::{DateTime, TimeZone, Utc};

use crate::models::{
    Availability, ContactMethods, Difficulty, DocSource, DocumentationLink, EntryMetadata,
    EntryStatus, FileReference, KnowledgeEntry, QueryCategory, Resources, Solution, User,
    UserStats,
};
use crate::store::KnowledgeStore;

fn date(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

pub fn demo_users() -> Vec<User> {
    vec![
        User {
            id: "1".to_string(),
            name: "John Smith".to_string(),
            email: "john.smith@company.com".to_string(),
            role: "Senior Backend Engineer".to_string(),
            department: "Engineering".to_string(),
            expertise_tags: vec![
                "Node.js".to_string(),
                "PostgreSQL".to_string(),
                "API Design".to_string(),
                "Microservices".to_string(),
                "Docker".to_string(),
            ],
            contact_methods: ContactMethods {
                teams: Some("john.smith".to_string()),
                slack: None,
                email: "john.smith@company.com".to_string(),
            },
            stats: UserStats {
                questions_asked: 15,
                questions_answered: 47,
                solution_rating: 4.7,
                response_time: 25,
            },
            availability: Availability::Available,
            avatar: None,
        },
        User {
            id: "2".to_string(),
            name: "Sarah Johnson".to_string(),
            email: "sarah.johnson@company.com".to_string(),
            role: "DevOps Lead".to_string(),
            department: "Engineering".to_string(),
            expertise_tags: vec![
                "Kubernetes".to_string(),
                "AWS".to_string(),
                "CI/CD".to_string(),
                "Terraform".to_string(),
                "Monitoring".to_string(),
            ],
            contact_methods: ContactMethods {
                teams: Some("sarah.johnson".to_string()),
                slack: None,
                email: "sarah.johnson@company.com".to_string(),
            },
            stats: UserStats {
                questions_asked: 8,
                questions_answered: 62,
                solution_rating: 4.9,
                response_time: 18,
            },
            availability: Availability::Available,
            avatar: None,
        },
        User {
            id: "3".to_string(),
            name: "Mike Chen".to_string(),
            email: "mike.chen@company.com".to_string(),
            role: "Tech Lead".to_string(),
            department: "Engineering".to_string(),
            expertise_tags: vec![
                "React".to_string(),
                "TypeScript".to_string(),
                "GraphQL".to_string(),
                "Frontend Architecture".to_string(),
            ],
            contact_methods: ContactMethods {
                teams: Some("mike.chen".to_string()),
                slack: None,
                email: "mike.chen@company.com".to_string(),
            },
            stats: UserStats {
                questions_asked: 22,
                questions_answered: 38,
                solution_rating: 4.5,
                response_time: 32,
            },
            availability: Availability::Busy,
            avatar: None,
        },
        User {
            id: "4".to_string(),
            name: "Jane Smith".to_string(),
            email: "jane.smith@company.com".to_string(),
            role: "HR Manager".to_string(),
            department: "Human Resources".to_string(),
            expertise_tags: vec![
                "Benefits".to_string(),
                "Payroll".to_string(),
                "Employee Relations".to_string(),
                "Onboarding".to_string(),
            ],
            contact_methods: ContactMethods {
                teams: Some("jane.smith".to_string()),
                slack: None,
                email: "jane.smith@company.com".to_string(),
            },
            stats: UserStats {
                questions_asked: 5,
                questions_answered: 156,
                solution_rating: 4.8,
                response_time: 45,
            },
            availability: Availability::Available,
            avatar: None,
        },
    ]
}

pub fn demo_entries() -> Vec<KnowledgeEntry> {
    let users = demo_users();

    vec![
        KnowledgeEntry {
            id: "k1".to_string(),
            title: "How to fix \"API returns 500 error in production\"".to_string(),
            problem: "Getting intermittent 500 errors from the /api/users endpoint in production, but works fine in staging.".to_string(),
            solution: Solution {
                summary: "Issue was caused by database connection pool exhaustion during high traffic.".to_string(),
                steps: vec![
                    "Check application logs for database connection errors".to_string(),
                    "Increase connection pool size in production config".to_string(),
                    "Add connection pool monitoring".to_string(),
                    "Implement request rate limiting".to_string(),
                ],
                code_snippets: vec![
                    "pool: { min: 2, max: 20 } // Increased from max: 10".to_string(),
                ],
            },
            asked_by: users[0].clone(),
            solved_by: vec![users[1].clone()],
            tags: vec![
                "API".to_string(),
                "Database".to_string(),
                "Production".to_string(),
                "PostgreSQL".to_string(),
                "500 Error".to_string(),
            ],
            category: QueryCategory::Engineering,
            resources: Resources {
                links: vec![
                    "https://wiki.company.com/database-pooling".to_string(),
                    "https://confluence.company.com/production-debugging".to_string(),
                ],
                files: Vec::new(),
                documentation: vec!["Database Connection Management Guide".to_string()],
            },
            metadata: EntryMetadata {
                created_at: date(2024, 11, 1),
                resolved_at: date(2024, 11, 1),
                resolution_time: 120,
                difficulty: Difficulty::Medium,
                views: 45,
                helpful_count: 12,
                not_helpful_count: 1,
                confluence_url: None,
            },
            status: EntryStatus::Verified,
        },
        KnowledgeEntry {
            id: "k2".to_string(),
            title: "Database migration best practices".to_string(),
            problem: "Need to migrate from MySQL to PostgreSQL. Looking for the best approach and common pitfalls.".to_string(),
            solution: Solution {
                summary: "Successfully migrated using a phased approach with dual-write strategy.".to_string(),
                steps: vec![
                    "Analyze schema differences and create mapping".to_string(),
                    "Setup PostgreSQL instance and replicate schema".to_string(),
                    "Implement dual-write to both databases".to_string(),
                    "Migrate historical data in batches".to_string(),
                    "Switch read traffic gradually".to_string(),
                    "Monitor for data consistency".to_string(),
                    "Decommission MySQL after validation period".to_string(),
                ],
                code_snippets: Vec::new(),
            },
            asked_by: users[2].clone(),
            solved_by: vec![users[0].clone(), users[1].clone()],
            tags: vec![
                "Database".to_string(),
                "Migration".to_string(),
                "PostgreSQL".to_string(),
                "MySQL".to_string(),
            ],
            category: QueryCategory::Engineering,
            resources: Resources {
                links: vec!["https://wiki.company.com/db-migration-guide".to_string()],
                files: vec![FileReference {
                    name: "migration-script.sql".to_string(),
                    url: "/files/migration-script.sql".to_string(),
                    kind: "sql".to_string(),
                    size: None,
                }],
                documentation: vec!["Database Migration Playbook".to_string()],
            },
            metadata: EntryMetadata {
                created_at: date(2024, 9, 15),
                resolved_at: date(2024, 9, 20),
                resolution_time: 7200,
                difficulty: Difficulty::Hard,
                views: 89,
                helpful_count: 23,
                not_helpful_count: 0,
                confluence_url: None,
            },
            status: EntryStatus::Verified,
        },
        KnowledgeEntry {
            id: "k3".to_string(),
            title: "How to request parental leave".to_string(),
            problem: "I need to take parental leave in 3 months. What is the process and required documentation?".to_string(),
            solution: Solution {
                summary: "Complete the parental leave form and submit 30 days before leave start date.".to_string(),
                steps: vec![
                    "Download parental leave form from HR portal".to_string(),
                    "Fill out form with expected dates".to_string(),
                    "Attach medical certificate (if required)".to_string(),
                    "Submit to HR at least 30 days in advance".to_string(),
                    "HR will confirm within 5 business days".to_string(),
                    "Coordinate handover with your manager".to_string(),
                ],
                code_snippets: Vec::new(),
            },
            asked_by: users[0].clone(),
            solved_by: vec![users[3].clone()],
            tags: vec![
                "HR".to_string(),
                "Parental Leave".to_string(),
                "Benefits".to_string(),
                "Time Off".to_string(),
            ],
            category: QueryCategory::Hr,
            resources: Resources {
                links: vec!["https://hr.company.com/parental-leave-policy".to_string()],
                files: vec![FileReference {
                    name: "parental-leave-form.pdf".to_string(),
                    url: "/files/parental-leave-form.pdf".to_string(),
                    kind: "pdf".to_string(),
                    size: None,
                }],
                documentation: vec!["Parental Leave Policy".to_string()],
            },
            metadata: EntryMetadata {
                created_at: date(2024, 10, 20),
                resolved_at: date(2024, 10, 20),
                resolution_time: 30,
                difficulty: Difficulty::Easy,
                views: 34,
                helpful_count: 15,
                not_helpful_count: 0,
                confluence_url: None,
            },
            status: EntryStatus::Active,
        },
        KnowledgeEntry {
            id: "k4".to_string(),
            title: "React component not re-rendering on state change".to_string(),
            problem: "My React component is not updating when I change the state. Using useState hook but UI stays the same.".to_string(),
            solution: Solution {
                summary: "Issue was mutating state directly instead of creating new object/array.".to_string(),
                steps: vec![
                    "Never mutate state directly".to_string(),
                    "For objects: use spread operator {...oldState, newProp: value}".to_string(),
                    "For arrays: use methods that return new arrays (map, filter, concat)".to_string(),
                    "Use React DevTools to verify state changes".to_string(),
                ],
                code_snippets: vec![
                    "// Wrong: setItems(items.push(newItem))".to_string(),
                    "// Correct: setItems([...items, newItem])".to_string(),
                ],
            },
            asked_by: users[1].clone(),
            solved_by: vec![users[2].clone()],
            tags: vec![
                "React".to_string(),
                "JavaScript".to_string(),
                "State Management".to_string(),
                "Frontend".to_string(),
            ],
            category: QueryCategory::Engineering,
            resources: Resources {
                links: vec!["https://react.dev/learn/updating-objects-in-state".to_string()],
                files: Vec::new(),
                documentation: vec!["React Best Practices Guide".to_string()],
            },
            metadata: EntryMetadata {
                created_at: date(2024, 11, 10),
                resolved_at: date(2024, 11, 10),
                resolution_time: 15,
                difficulty: Difficulty::Easy,
                views: 28,
                helpful_count: 8,
                not_helpful_count: 0,
                confluence_url: None,
            },
            status: EntryStatus::Active,
        },
    ]
}

pub fn demo_documentation() -> Vec<DocumentationLink> {
    vec![
        DocumentationLink {
            id: "d1".to_string(),
            title: "API Development Guidelines".to_string(),
            url: "https://wiki.company.com/api-guidelines".to_string(),
            description: "Best practices for designing and implementing RESTful APIs".to_string(),
            tags: vec!["API".to_string(), "Backend".to_string(), "REST".to_string()],
            source: DocSource::Wiki,
        },
        DocumentationLink {
            id: "d2".to_string(),
            title: "Production Deployment Checklist".to_string(),
            url: "https://confluence.company.com/deployment-checklist".to_string(),
            description: "Step-by-step guide for deploying to production safely".to_string(),
            tags: vec![
                "Deployment".to_string(),
                "Production".to_string(),
                "DevOps".to_string(),
            ],
            source: DocSource::Confluence,
        },
        DocumentationLink {
            id: "d3".to_string(),
            title: "Frontend Component Library".to_string(),
            url: "https://github.com/company/design-system".to_string(),
            description: "Reusable React components and design system".to_string(),
            tags: vec![
                "React".to_string(),
                "Frontend".to_string(),
                "UI".to_string(),
                "Design System".to_string(),
            ],
            source: DocSource::Github,
        },
    ]
}

/// Seed an empty store. The documentation index is always backfilled when
/// missing; demo users and entries only go in when the store has no
/// entries at all. Returns whether anything was written.
pub async fn ensure_seeded(store: &dyn KnowledgeStore) -> Result<bool> {
    let mut seeded = false;

    if store.all_documentation().await?.is_empty() {
        store.save_documentation(demo_documentation()).await?;
        seeded = true;
    }

    if store.all_entries().await?.is_empty() {
        for user in demo_users() {
            store.save_user(user).await?;
        }
        for entry in demo_entries() {
            store.save_entry(entry).await?;
        }
        seeded = true;
    }

    Ok(seeded)
}
