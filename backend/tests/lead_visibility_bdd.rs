//! Behaviour tests for role-scoped lead visibility and assignment.
//!
//! Scenarios run the domain services over the in-memory store exposed by the
//! `test-support` feature, so no database is required.

use std::collections::HashMap;
use std::sync::Arc;

use crm::domain::{AgentId, Caller, ErrorCode, Lead, LeadId, OrganisationId, UserId};
use crm::inbound::http::state::HttpState;
use crm::test_support::http::memory_http_state;
use crm::test_support::memory::InMemoryCrm;
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::{ScenarioState, given, scenario, then, when};
use tokio::runtime::Runtime;

const PASSWORD: &str = "plain-password";

/// Ids of everything seeded by the background steps, keyed by name.
#[derive(Clone, Default)]
struct Directory {
    users: HashMap<String, UserId>,
    agents: HashMap<String, AgentId>,
    organisations: HashMap<String, OrganisationId>,
    leads: HashMap<String, LeadId>,
}

#[derive(Clone)]
struct Harness {
    runtime: Arc<Runtime>,
    store: Arc<InMemoryCrm>,
    state: HttpState,
}

#[derive(Default, ScenarioState)]
struct LeadWorld {
    harness: Slot<Harness>,
    directory: Slot<Directory>,
    visible: Slot<Vec<String>>,
    unassigned: Slot<Option<Vec<String>>>,
    failure: Slot<ErrorCode>,
}

impl LeadWorld {
    fn harness(&self) -> Harness {
        self.harness.get().expect("harness should be initialised")
    }

    fn directory(&self) -> Directory {
        self.directory.get().unwrap_or_default()
    }

    fn update_directory(&self, change: impl FnOnce(&mut Directory)) {
        let mut directory = self.directory();
        change(&mut directory);
        self.directory.set(directory);
    }

    fn caller(&self, username: &str) -> Caller {
        let harness = self.harness();
        let user_id = self.directory().users[username];
        harness
            .runtime
            .block_on(harness.state.callers.resolve_caller(user_id))
            .expect("caller should resolve")
    }

    fn seed_organisation(&self, owner: &str, agents: &[&str]) {
        let store = self.harness().store;
        let (owner_id, organisation_id) = store.seed_organisor(owner, PASSWORD);
        let seeded: Vec<(String, UserId, AgentId)> = agents
            .iter()
            .map(|name| {
                let (user_id, agent_id) = store.seed_agent(organisation_id, name, PASSWORD);
                ((*name).to_owned(), user_id, agent_id)
            })
            .collect();
        self.update_directory(|directory| {
            directory.users.insert(owner.to_owned(), owner_id);
            directory
                .organisations
                .insert(owner.to_owned(), organisation_id);
            for (name, user_id, agent_id) in seeded {
                directory.users.insert(name.clone(), user_id);
                directory.agents.insert(name, agent_id);
            }
        });
    }

    fn seed_lead(&self, owner: &str, name: &str, agent: Option<&str>) {
        let directory = self.directory();
        let organisation_id = directory.organisations[owner];
        let agent_id = agent.map(|agent| directory.agents[agent]);
        let lead_id = self
            .harness()
            .store
            .seed_lead(organisation_id, name, agent_id, None);
        self.update_directory(|directory| {
            directory.leads.insert(name.to_owned(), lead_id);
        });
    }

    fn record<T>(&self, outcome: Result<T, crm::domain::Error>) {
        if let Err(error) = outcome {
            self.failure.set(error.code());
        }
    }
}

fn first_names(leads: &[Lead]) -> Vec<String> {
    let mut names: Vec<String> = leads
        .iter()
        .map(|lead| lead.fields().first_name().to_owned())
        .collect();
    names.sort();
    names
}

fn parse_names(list: &str) -> Vec<String> {
    let mut names: Vec<String> = list.split(',').map(|name| name.trim().to_owned()).collect();
    names.sort();
    names
}

#[fixture]
fn world() -> LeadWorld {
    let world = LeadWorld::default();
    let store = Arc::new(InMemoryCrm::new());
    world.harness.set(Harness {
        runtime: Arc::new(Runtime::new().expect("create runtime")),
        state: memory_http_state(store.clone()),
        store,
    });
    world
}

#[given("an organisation run by {owner} with agents {first} and {second}")]
fn an_organisation_with_agents(world: &LeadWorld, owner: String, first: String, second: String) {
    world.seed_organisation(&owner, &[&first, &second]);
}

#[given("lead {name} is assigned to {agent}")]
fn lead_is_assigned_to(world: &LeadWorld, name: String, agent: String) {
    world.seed_lead("olive", &name, Some(&agent));
}

#[given("lead {name} is unassigned")]
fn lead_is_unassigned(world: &LeadWorld, name: String) {
    world.seed_lead("olive", &name, None);
}

#[given("a rival organisation run by {owner} with lead {name}")]
fn a_rival_organisation(world: &LeadWorld, owner: String, name: String) {
    world.seed_organisation(&owner, &[]);
    world.seed_lead(&owner, &name, None);
}

#[when("{user} lists leads")]
fn user_lists_leads(world: &LeadWorld, user: String) {
    let caller = world.caller(&user);
    let harness = world.harness();
    let listing = harness
        .runtime
        .block_on(harness.state.leads_query.list_leads(&caller))
        .expect("listing should succeed");
    world.visible.set(first_names(&listing.leads));
    world
        .unassigned
        .set(listing.unassigned_leads.as_deref().map(first_names));
}

#[when("{user} opens lead {name}")]
fn user_opens_lead(world: &LeadWorld, user: String, name: String) {
    let caller = world.caller(&user);
    let lead_id = world.directory().leads[&name];
    let harness = world.harness();
    let outcome = harness
        .runtime
        .block_on(harness.state.leads_query.lead_detail(&caller, lead_id));
    world.record(outcome);
}

#[when("{user} assigns lead {name} to {agent}")]
fn user_assigns_lead(world: &LeadWorld, user: String, name: String, agent: String) {
    let caller = world.caller(&user);
    let directory = world.directory();
    let harness = world.harness();
    let outcome = harness.runtime.block_on(harness.state.leads.assign_agent(
        &caller,
        directory.leads[&name],
        directory.agents[&agent],
    ));
    world.record(outcome);
}

#[when("{user} deletes agent {agent}")]
fn user_deletes_agent(world: &LeadWorld, user: String, agent: String) {
    let caller = world.caller(&user);
    let agent_id = world.directory().agents[&agent];
    let harness = world.harness();
    let outcome = harness
        .runtime
        .block_on(harness.state.agents.delete_agent(&caller, agent_id));
    world.record(outcome);
}

#[then("the visible leads are {names}")]
fn the_visible_leads_are(world: &LeadWorld, names: String) {
    assert_eq!(world.visible.get(), Some(parse_names(&names)));
}

#[then("the unassigned leads are {names}")]
fn the_unassigned_leads_are(world: &LeadWorld, names: String) {
    assert_eq!(world.unassigned.get(), Some(Some(parse_names(&names))));
}

#[then("no unassigned leads are reported")]
fn no_unassigned_leads_are_reported(world: &LeadWorld) {
    assert_eq!(world.unassigned.get(), Some(None));
}

#[then("the request fails as not found")]
fn the_request_fails_as_not_found(world: &LeadWorld) {
    assert_eq!(world.failure.get(), Some(ErrorCode::NotFound));
}

#[then("the request fails as invalid")]
fn the_request_fails_as_invalid(world: &LeadWorld) {
    assert_eq!(world.failure.get(), Some(ErrorCode::InvalidRequest));
}

#[scenario(
    path = "tests/features/lead_visibility.feature",
    name = "Organisors see assigned and unassigned leads separately"
)]
fn organisors_see_assigned_and_unassigned_leads_separately(world: LeadWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/lead_visibility.feature",
    name = "Agents see only their own leads"
)]
fn agents_see_only_their_own_leads(world: LeadWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/lead_visibility.feature",
    name = "Agents cannot open a colleague's lead"
)]
fn agents_cannot_open_a_colleagues_lead(world: LeadWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/lead_visibility.feature",
    name = "Organisors cannot open another organisation's lead"
)]
fn organisors_cannot_open_another_organisations_lead(world: LeadWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/lead_visibility.feature",
    name = "Assigning an agent moves the lead into their list"
)]
fn assigning_an_agent_moves_the_lead_into_their_list(world: LeadWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/lead_visibility.feature",
    name = "Agents of another organisation cannot be assigned"
)]
fn agents_of_another_organisation_cannot_be_assigned(world: LeadWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/lead_visibility.feature",
    name = "Deleting an agent returns their leads to the unassigned pool"
)]
fn deleting_an_agent_returns_their_leads_to_the_unassigned_pool(world: LeadWorld) {
    let _ = world;
}
