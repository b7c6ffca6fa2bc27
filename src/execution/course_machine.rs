//! Course pipeline state machine
//!
//! `transition` is pure: it never calls the model. The runner performs the
//! stage matching the current status and feeds its result back as an event.

use crate::core::course::{Course, Lesson, Module};
use crate::execution::state::{CourseState, CourseStatus, Cursor};
use crate::stages::course::{CoursePlan, LessonDraft, ReviewFeedback};

/// Placeholder key points given to every planned lesson
const PLACEHOLDER_KEY_POINTS: usize = 3;

/// Results fed into the machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CourseEvent {
    Planned(CoursePlan),
    LessonGenerated(LessonDraft),
    Reviewed(ReviewFeedback),
}

impl CourseEvent {
    fn name(&self) -> &'static str {
        match self {
            CourseEvent::Planned(_) => "Planned",
            CourseEvent::LessonGenerated(_) => "LessonGenerated",
            CourseEvent::Reviewed(_) => "Reviewed",
        }
    }
}

/// Advance the course state by one event
pub fn transition(mut state: CourseState, event: CourseEvent) -> CourseState {
    let status = std::mem::replace(&mut state.status, CourseStatus::Planning);

    let next = match (status, event) {
        (CourseStatus::Planning, CourseEvent::Planned(plan)) => {
            let course = skeleton(&state.topic, plan);
            let status = match Cursor::first(&course) {
                Some(cursor) => CourseStatus::GeneratingContent { cursor },
                None => CourseStatus::Failed {
                    reason: "course plan contains no lessons".to_string(),
                },
            };
            state.course = Some(course);
            status
        }

        (CourseStatus::GeneratingContent { cursor }, CourseEvent::LessonGenerated(draft)) => {
            let Some(course) = state.course.as_mut() else {
                return failed(state, "course structure is required for content generation");
            };
            let Some(lesson) = course.lesson_mut(cursor.module, cursor.lesson) else {
                return failed(
                    state,
                    &format!(
                        "no lesson at module {} lesson {}",
                        cursor.module, cursor.lesson
                    ),
                );
            };
            lesson.summary = draft.summary;
            lesson.objectives = draft.objectives;
            lesson.key_points = draft.key_points;

            let next = cursor.advance(course);
            if state.review_enabled {
                CourseStatus::Reviewing { cursor, next }
            } else {
                after_lesson(next)
            }
        }

        (CourseStatus::Reviewing { cursor, next }, CourseEvent::Reviewed(feedback)) => {
            if !feedback.is_approved {
                let title = state
                    .course
                    .as_ref()
                    .and_then(|c| c.lesson(cursor.module, cursor.lesson))
                    .map(|l| l.title.clone())
                    .unwrap_or_default();
                state
                    .notes
                    .push(format!("Review for {}: {}", title, feedback.feedback));
            }
            after_lesson(next)
        }

        (CourseStatus::Failed { reason }, _) => CourseStatus::Failed { reason },

        (status, event) => CourseStatus::Failed {
            reason: format!("unexpected {} event while {}", event.name(), describe(&status)),
        },
    };

    state.status = next;
    state
}

fn after_lesson(next: Option<Cursor>) -> CourseStatus {
    match next {
        Some(cursor) => CourseStatus::GeneratingContent { cursor },
        None => CourseStatus::Done,
    }
}

fn failed(mut state: CourseState, reason: &str) -> CourseState {
    state.status = CourseStatus::Failed {
        reason: reason.to_string(),
    };
    state
}

fn describe(status: &CourseStatus) -> &'static str {
    match status {
        CourseStatus::Planning => "planning",
        CourseStatus::GeneratingContent { .. } => "generating content",
        CourseStatus::Reviewing { .. } => "reviewing",
        CourseStatus::Done => "done",
        CourseStatus::Failed { .. } => "failed",
    }
}

/// Course with placeholder lessons for every planned module
fn skeleton(topic: &str, plan: CoursePlan) -> Course {
    let modules = plan
        .modules
        .into_iter()
        .map(|m| {
            let lessons = (0..m.num_lessons)
                .map(|j| Lesson {
                    title: format!("Lesson {}", j + 1),
                    summary: format!("Summary for lesson {} of {}", j + 1, m.title),
                    objectives: m.learning_objectives.clone(),
                    key_points: (0..PLACEHOLDER_KEY_POINTS)
                        .map(|k| format!("Key point {}", k + 1))
                        .collect(),
                })
                .collect();
            Module {
                title: m.title,
                description: m.description,
                lessons,
            }
        })
        .collect();

    Course {
        topic: topic.to_string(),
        modules,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stages::course::ModulePlan;

    fn plan(sizes: &[usize]) -> CoursePlan {
        CoursePlan {
            course_title: "Rust".to_string(),
            course_description: String::new(),
            modules: sizes
                .iter()
                .enumerate()
                .map(|(i, &n)| ModulePlan {
                    title: format!("Module {}", i + 1),
                    description: String::new(),
                    learning_objectives: vec!["Objective".to_string()],
                    num_lessons: n,
                })
                .collect(),
        }
    }

    fn draft(summary: &str) -> LessonDraft {
        LessonDraft {
            title: String::new(),
            summary: summary.to_string(),
            objectives: vec!["Learn".to_string()],
            key_points: vec!["Point".to_string()],
        }
    }

    fn review(approved: bool) -> ReviewFeedback {
        ReviewFeedback {
            is_approved: approved,
            feedback: "Needs more examples".to_string(),
            suggestions: vec![],
        }
    }

    #[test]
    fn test_plan_builds_skeleton() {
        let state = transition(CourseState::new("Rust"), CourseEvent::Planned(plan(&[2, 1])));
        assert_eq!(
            state.status,
            CourseStatus::GeneratingContent { cursor: Cursor::new(0, 0) }
        );
        let course = state.course.unwrap();
        assert_eq!(course.lesson_count(), 3);
        let lesson = course.lesson(0, 1).unwrap();
        assert_eq!(lesson.title, "Lesson 2");
        assert_eq!(lesson.summary, "Summary for lesson 2 of Module 1");
        assert_eq!(lesson.objectives, vec!["Objective".to_string()]);
        assert_eq!(lesson.key_points, vec!["Key point 1", "Key point 2", "Key point 3"]);
    }

    #[test]
    fn test_cursor_walks_course_and_completes() {
        let mut state = transition(
            CourseState::new("Rust").with_review(false),
            CourseEvent::Planned(plan(&[2, 1])),
        );
        let mut cursors = Vec::new();
        while let CourseStatus::GeneratingContent { cursor } = state.status.clone() {
            cursors.push(cursor);
            assert!(!state.is_complete());
            state = transition(state, CourseEvent::LessonGenerated(draft("Filled")));
        }
        assert_eq!(
            cursors,
            vec![Cursor::new(0, 0), Cursor::new(0, 1), Cursor::new(1, 0)]
        );
        assert_eq!(state.status, CourseStatus::Done);
        assert!(state.is_complete());
        assert_eq!(state.course.unwrap().lesson(1, 0).unwrap().summary, "Filled");
    }

    #[test]
    fn test_review_follows_each_lesson() {
        let state = transition(CourseState::new("Rust"), CourseEvent::Planned(plan(&[1, 1])));
        let state = transition(state, CourseEvent::LessonGenerated(draft("One")));
        assert_eq!(
            state.status,
            CourseStatus::Reviewing {
                cursor: Cursor::new(0, 0),
                next: Some(Cursor::new(1, 0)),
            }
        );
        let state = transition(state, CourseEvent::Reviewed(review(true)));
        assert_eq!(
            state.status,
            CourseStatus::GeneratingContent { cursor: Cursor::new(1, 0) }
        );
        assert!(state.notes.is_empty());

        let state = transition(state, CourseEvent::LessonGenerated(draft("Two")));
        assert!(state.is_complete());
        let state = transition(state, CourseEvent::Reviewed(review(false)));
        assert_eq!(state.status, CourseStatus::Done);
        assert_eq!(state.notes, vec!["Review for Lesson 1: Needs more examples".to_string()]);
    }

    #[test]
    fn test_content_without_structure_fails() {
        let mut state = CourseState::new("Rust");
        state.status = CourseStatus::GeneratingContent { cursor: Cursor::new(0, 0) };
        let state = transition(state, CourseEvent::LessonGenerated(draft("x")));
        assert_eq!(
            state.status,
            CourseStatus::Failed {
                reason: "course structure is required for content generation".to_string()
            }
        );
    }

    #[test]
    fn test_unexpected_event_fails() {
        let state = transition(CourseState::new("Rust"), CourseEvent::Reviewed(review(true)));
        assert!(state.is_failed());
    }
}
