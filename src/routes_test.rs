use super::*;

// =============================================================
// RouteRule
// =============================================================

#[test]
fn authenticated_rule_permits_any_role() {
    let rule = RouteRule::authenticated();
    assert!(rule.permits(None));
    assert!(rule.permits(Some(&Role::Patient)));
}

#[test]
fn role_rule_requires_membership() {
    let rule = RouteRule::from_names(&["ADMIN"]);
    assert!(rule.permits(Some(&Role::Admin)));
    assert!(!rule.permits(Some(&Role::Patient)));
    assert!(!rule.permits(None));
}

#[test]
fn from_names_accepts_prefixed_names() {
    assert_eq!(RouteRule::from_names(&["ROLE_MEDECIN"]), RouteRule::roles([Role::Medecin]));
}

#[test]
fn from_names_ignores_blank_entries() {
    assert_eq!(RouteRule::from_names(&["", " "]), RouteRule::authenticated());
}

// =============================================================
// RouteTable
// =============================================================

#[test]
fn public_routes_have_no_rule() {
    let table = RouteTable::clinic();
    assert!(table.rule_for("/auth").is_none());
    assert!(table.rule_for("/auth/login?returnUrl=/admin").is_none());
    assert!(table.rule_for("/unauthorized").is_none());
}

#[test]
fn role_sections_require_their_role() {
    let table = RouteTable::clinic();
    assert_eq!(table.rule_for("/admin/dashboard"), Some(&RouteRule::roles([Role::Admin])));
    assert_eq!(table.rule_for("/medecin/profile"), Some(&RouteRule::roles([Role::Medecin])));
    assert_eq!(table.rule_for("/patient"), Some(&RouteRule::roles([Role::Patient])));
}

#[test]
fn unlisted_paths_need_authentication() {
    let table = RouteTable::clinic();
    assert_eq!(table.rule_for("/"), Some(&RouteRule::authenticated()));
    assert_eq!(table.rule_for("/contacts/profile"), Some(&RouteRule::authenticated()));
}

#[test]
fn prefix_match_respects_segment_boundaries() {
    let table = RouteTable::clinic();
    // "/administration" is not under "/admin".
    assert_eq!(table.rule_for("/administration"), Some(&RouteRule::authenticated()));
    assert!(table.rule_for("/authors").is_some());
}

#[test]
fn longest_prefix_wins() {
    let table = RouteTable::new(RouteAccess::Public)
        .protected("/admin", RouteRule::roles([Role::Admin]))
        .public("/admin/help");
    assert!(table.rule_for("/admin/help/faq").is_none());
    assert!(table.rule_for("/admin/users").is_some());
}

#[test]
fn landing_pages_by_role() {
    let table = RouteTable::clinic();
    assert_eq!(table.landing_for(Some(&Role::Admin)), "/admin/dashboard");
    assert_eq!(table.landing_for(Some(&Role::Medecin)), "/medecin/dashboard");
    assert_eq!(table.landing_for(Some(&Role::Patient)), "/patient/dashboard");
    assert_eq!(table.landing_for(Some(&Role::Other("NURSE".into()))), UNAUTHORIZED_ROUTE);
    assert_eq!(table.landing_for(None), UNAUTHORIZED_ROUTE);
}

#[test]
fn path_of_strips_query_and_fragment() {
    assert_eq!(path_of("/admin/dashboard?tab=1#top"), "/admin/dashboard");
    assert_eq!(path_of("?x=1"), "/");
}
