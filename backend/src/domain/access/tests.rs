//! Visibility rules for organisors and agents.

use super::*;
use crate::domain::{CategoryId, ErrorCode};
use crate::test_support::fixtures::{agent_caller, category, lead, organisor_caller};
use rstest::rstest;

#[rstest]
fn organisor_scope_covers_whole_organisation() {
    let scope = RecordScope::for_caller(&organisor_caller(1, 10));
    assert_eq!(scope.organisation_id(), OrganisationId::new(10));
    assert_eq!(scope.agent_id(), None);
    assert!(scope.admits_lead(&lead(1, 10, None, None)));
    assert!(scope.admits_lead(&lead(2, 10, Some(5), None)));
    assert!(!scope.admits_lead(&lead(3, 11, Some(5), None)));
}

#[rstest]
#[case::own_lead(lead(1, 10, Some(5), None), true)]
#[case::colleague_lead(lead(2, 10, Some(6), None), false)]
#[case::unassigned_lead(lead(3, 10, None, None), false)]
#[case::other_organisation(lead(4, 11, Some(5), None), false)]
fn agent_scope_admits_only_own_leads(#[case] candidate: Lead, #[case] expected: bool) {
    let scope = RecordScope::for_caller(&agent_caller(2, 5, 10));
    assert_eq!(scope.admits_lead(&candidate), expected);
}

#[rstest]
fn agents_see_every_category_in_their_organisation() {
    let scope = RecordScope::for_caller(&agent_caller(2, 5, 10));
    assert!(scope.admits_category(&category(1, 10, "Contacted")));
    assert!(!scope.admits_category(&category(2, 11, "Contacted")));
}

#[rstest]
fn only_organisors_pass_the_organisor_guard() {
    assert_eq!(
        organisor_caller(1, 10).require_organisor().expect("organisor"),
        OrganisationId::new(10)
    );
    let err = agent_caller(2, 5, 10)
        .require_organisor()
        .expect_err("agents are refused");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
fn anonymous_guard_refuses_signed_in_sessions() {
    assert!(require_anonymous(None::<i64>).is_ok());
    let err = require_anonymous(Some(1)).expect_err("signed in");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[case::assigned(AgentFilter::Assigned, CategoryFilter::Any, vec![2, 3])]
#[case::unassigned(AgentFilter::Unassigned, CategoryFilter::Any, vec![1])]
#[case::uncategorised(AgentFilter::Any, CategoryFilter::Uncategorised, vec![1, 2])]
#[case::categorised(AgentFilter::Any, CategoryFilter::Categorised, vec![3])]
#[case::one_category(AgentFilter::Any, CategoryFilter::Only(CategoryId::new(7)), vec![3])]
fn lead_filter_narrows_scope(
    #[case] agent: AgentFilter,
    #[case] category: CategoryFilter,
    #[case] expected: Vec<i64>,
) {
    let leads = [
        lead(1, 10, None, None),
        lead(2, 10, Some(5), None),
        lead(3, 10, Some(6), Some(7)),
        lead(4, 11, Some(5), Some(7)),
    ];
    let filter = LeadFilter::visible(RecordScope::organisation(OrganisationId::new(10)))
        .with_agent(agent)
        .with_category(category);
    let admitted: Vec<i64> = leads
        .iter()
        .filter(|candidate| filter.admits(candidate))
        .map(|candidate| candidate.id().get())
        .collect();
    assert_eq!(admitted, expected);
}
