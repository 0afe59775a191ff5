use contact_restorer::{
    find_duplicates, initialize_merge_selections, merge_contacts, parse_contacts, to_csv,
    Contact, MergeSelections,
};

/// Label/value rows in the shape of a `synced_contacts.html` export
fn synced_row(label: &str, value: &str) -> String {
    format!(
        r#"<tr><td class="_2pin _a6_q">{label}<div><div>{value}</div></div></td></tr>"#
    )
}

fn synced_export(rows: &[(&str, &str)]) -> String {
    let body: String = rows.iter().map(|(l, v)| synced_row(l, v)).collect();
    format!(
        r#"<html><head><title>Synced contacts</title></head>
        <body><div class="_a706"><table style="table-layout: fixed;">{body}</table></div></body></html>"#
    )
}

#[test]
fn duplicate_phone_from_structured_export() {
    let html = synced_export(&[
        ("First Name", "Asha"),
        ("Last Name", "Verma"),
        ("Contact Information", "+911234567890"),
        ("First Name", "A."),
        ("Last Name", "Verma"),
        ("Contact Information", "+911234567890"),
    ]);

    let contacts = parse_contacts(&html);
    let names: Vec<&str> = contacts.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Asha Verma", "A. Verma"]);

    let groups = find_duplicates(&contacts);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].phone, "+911234567890");
    assert_eq!(groups[0].contacts.len(), 2);
    assert_eq!(groups[0].contacts[1].original_index, Some(1));
}

#[test]
fn embedded_vcard() {
    let contacts = parse_contacts("BEGIN:VCARD\nVERSION:3.0\nFN:Jon Snow\nTEL:555-1234\nEND:VCARD");

    assert_eq!(contacts[0], Contact::new("Jon Snow", "555-1234", "", ""));
    // The free-text pass also reads the card body as one collapsed line
    assert_eq!(contacts.len(), 2);
    assert!(contacts[1].name.starts_with("BEGIN:VCARD VERSION:3.0 FN:Jon Snow"));
    assert!(contacts[1].phone.is_empty());
}

#[test]
fn preformatted_free_text() {
    let contacts =
        parse_contacts("<body><pre>Jon Snow\n555-123456\nArya Stark\n555-987654</pre></body>");

    assert_eq!(
        contacts,
        vec![
            Contact::new("Jon Snow", "555-123456", "", ""),
            Contact::new("Arya Stark", "555-987654", "", ""),
        ]
    );
}

#[test]
fn merge_keeps_phoneless_and_selected() {
    let contacts = vec![
        Contact::new("A", "", "", ""),
        Contact::new("B", "1", "", ""),
        Contact::new("C", "1", "", ""),
    ];
    let groups = find_duplicates(&contacts);
    let selections: MergeSelections = [("1", "B")].into_iter().collect();

    let merged = merge_contacts(&contacts, &groups, &selections);
    assert_eq!(
        merged,
        vec![Contact::new("A", "", "", ""), Contact::new("B", "1", "", "")]
    );
}

#[test]
fn csv_export_escapes_quotes() {
    let contacts = vec![Contact::new(r#"Ravi "RK" Kumar"#, "", "", "")];

    let csv = to_csv(&contacts).unwrap();
    assert!(csv.starts_with('\u{feff}'));
    assert!(csv.contains(r#""Ravi ""RK"" Kumar""#));
}

#[test]
fn case_insensitive_dedup() {
    let html = r#"
    <table>
        <tr><td>john</td><td>555-0000</td></tr>
        <tr><td>John</td><td>555-0000</td></tr>
    </table>
    "#;

    let contacts = parse_contacts(html);
    let johns: Vec<&Contact> = contacts.iter().filter(|c| c.phone == "555-0000").collect();
    assert_eq!(johns.len(), 1);
    assert_eq!(johns[0].name, "john");
}

#[test]
fn merged_groups_share_selected_name() {
    let html = synced_export(&[
        ("First Name", "Ravi"),
        ("Phone", "98765 43210"),
        ("First Name", "RK"),
        ("Phone", "98765 43210"),
        ("First Name", "Meera"),
        ("Phone", "11111 22222"),
        ("First Name", "Mira"),
        ("Phone", "11111 22222"),
        ("First Name", "Solo"),
        ("Email", "solo@example.com"),
    ]);

    let contacts = parse_contacts(&html);
    let groups = find_duplicates(&contacts);
    assert_eq!(groups.len(), 2);

    let mut selections = initialize_merge_selections(&groups);
    selections.select("11111 22222", "Mira");

    let merged = merge_contacts(&contacts, &groups, &selections);
    for group in &groups {
        let chosen = selections.get(&group.phone).unwrap();
        assert!(merged
            .iter()
            .filter(|c| c.phone == group.phone)
            .all(|c| c.name == chosen));
    }

    // subset of the input, relative order kept
    let positions: Vec<usize> = merged
        .iter()
        .map(|m| contacts.iter().position(|c| c == m).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));

    let names: Vec<&str> = merged.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Ravi", "Mira", "Solo"]);
}

#[test]
fn groups_always_have_two_members() {
    let html = r#"
    <div class="contact"><span class="name">One</span><span class="phone">1</span></div>
    <div class="contact"><span class="name">Two</span><span class="phone">2</span></div>
    <div class="contact"><span class="name">Another One</span><span class="phone">1</span></div>
    "#;

    let contacts = parse_contacts(html);
    for group in find_duplicates(&contacts) {
        assert!(group.contacts.len() >= 2);
        assert!(!group.phone.is_empty());
        assert!(group.contacts.iter().all(|c| c.phone.trim() == group.phone));
    }
}
