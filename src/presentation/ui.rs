use crate::application::{AddPetField, App, Focus, Screen};
use crate::domain::{Owner, Pet};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Cell, Clear, List, ListItem, Paragraph, Row, Table},
    Frame,
};

pub fn render_ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.area());

    render_header(f, app, chunks[0]);
    match app.screen {
        Screen::Pets => render_pets_list(f, app, chunks[1]),
        Screen::Owners => render_owners_list(f, app, chunks[1]),
    }
    render_status_bar(f, app, chunks[2]);

    if app.pets.add_dialog.is_visible() && app.screen == Screen::Pets {
        render_add_pet_popup(f, app);
    }
    if app.screen == Screen::Pets {
        if let Some(pet) = app.pets.remove_dialog.target() {
            render_confirm_popup(f, &format!("Unregister {}?", pet.name));
        }
    }
    if app.screen == Screen::Owners {
        if let Some(owner) = app.owners.remove_dialog.target() {
            render_confirm_popup(f, &format!("Unregister {}?", owner.name));
        }
        if app.owners.edit_dialog.is_visible() {
            render_edit_owner_popup(f, app);
        }
    }
    if matches!(app.focus, Focus::Help) {
        render_help_popup(f, app.help_scroll);
    }
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let tab = |label: &str, active: bool| {
        if active {
            format!("[{}]", label)
        } else {
            format!(" {} ", label)
        }
    };
    let header = Paragraph::new(format!(
        "petbook | {} {} | /: search",
        tab("1:Pets", app.screen == Screen::Pets),
        tab("2:Owners", app.screen == Screen::Owners),
    ))
    .style(Style::default().fg(Color::Cyan));
    f.render_widget(header, area);
}

fn pet_type_name(pet: &Pet) -> &str {
    pet.pet_type.as_ref().map(|t| t.name.as_str()).unwrap_or("-")
}

fn pet_owner_name(pet: &Pet) -> &str {
    pet.owner.as_ref().map(|o| o.name.as_str()).unwrap_or("-")
}

fn render_pets_list(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title("Pets");

    if app.pets.pets.is_empty() {
        render_empty_state(f, app, area, block, "No pets registered. Press 'a' to add one.");
        return;
    }

    let header = Row::new(vec!["Name", "Age", "Type", "Owner"])
        .style(Style::default().fg(Color::Yellow))
        .height(1);

    let rows: Vec<Row> = app
        .pets
        .pets
        .iter()
        .enumerate()
        .map(|(i, pet)| {
            let style = if i == app.pets.selected {
                Style::default().bg(Color::Blue).fg(Color::White)
            } else {
                Style::default()
            };
            Row::new(vec![
                Cell::from(pet.name.clone()),
                Cell::from(pet.age.to_string()),
                Cell::from(pet_type_name(pet).to_string()),
                Cell::from(pet_owner_name(pet).to_string()),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Percentage(35),
        Constraint::Length(5),
        Constraint::Percentage(25),
        Constraint::Percentage(30),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .column_spacing(1);
    f.render_widget(table, area);
}

fn render_owners_list(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title("Owners");

    if app.owners.owners.is_empty() {
        render_empty_state(f, app, area, block, "No owners registered.");
        return;
    }

    let mut items = Vec::new();
    for (i, owner) in app.owners.owners.iter().enumerate() {
        let style = if i == app.owners.selected {
            Style::default().bg(Color::Blue).fg(Color::White)
        } else {
            Style::default()
        };
        let noun = if owner.pets.len() == 1 { "pet" } else { "pets" };
        items.push(
            ListItem::new(format!("{} ({} {})", owner.name, owner.pets.len(), noun))
                .style(style),
        );
        if app.owners.expanded == Some(owner.id) {
            items.extend(expanded_pet_lines(owner));
        }
    }

    let list = List::new(items).block(block);
    f.render_widget(list, area);
}

fn expanded_pet_lines(owner: &Owner) -> Vec<ListItem<'static>> {
    if owner.pets.is_empty() {
        return vec![
            ListItem::new("    no pets".to_string()).style(Style::default().fg(Color::DarkGray)),
        ];
    }
    owner
        .pets
        .iter()
        .map(|pet| {
            ListItem::new(format!(
                "    {} ({}, age {})",
                pet.name,
                pet_type_name(pet),
                pet.age
            ))
            .style(Style::default().fg(Color::Gray))
        })
        .collect()
}

fn render_empty_state(f: &mut Frame, app: &App, area: Rect, block: Block, no_entries: &str) {
    let query = app.active_search_query();
    let text = if query.is_empty() {
        no_entries.to_string()
    } else {
        format!("No results found for \"{}\"", query)
    };
    let empty = Paragraph::new(text)
        .block(block)
        .style(Style::default().fg(Color::DarkGray));
    f.render_widget(empty, area);
}

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let input_text = match app.focus {
        Focus::Browse => {
            if let Some(ref status) = app.status_message {
                status.clone()
            } else {
                match app.screen {
                    Screen::Pets => {
                        "a: add | d: remove | /: search | Ctrl+E: export CSV | Tab: owners | F1/?: help | q: quit".to_string()
                    }
                    Screen::Owners => {
                        "Enter: expand | e: edit | d: remove | /: search | Ctrl+E: export CSV | Tab: pets | F1/?: help | q: quit".to_string()
                    }
                }
            }
        }
        Focus::Search => format!(
            "Search: {} (Enter to keep filter, Esc to clear)",
            app.active_search_query()
        ),
        Focus::Help => "↑↓/jk: scroll | PgUp/PgDn: fast scroll | Home: top | Esc/q: close help".to_string(),
        Focus::ExportCsv => format!(
            "Export CSV as: {} (Enter to export, Esc to cancel)",
            app.filename_input
        ),
    };

    let input = Paragraph::new(input_text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(match app.focus {
            Focus::Browse => Style::default(),
            Focus::Search => Style::default().fg(Color::Green),
            Focus::Help => Style::default().fg(Color::Cyan),
            Focus::ExportCsv => Style::default().fg(Color::Magenta),
        });
    f.render_widget(input, area);
}

fn centered_popup(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn field_line(label: &str, value: String, focused: bool, warning: bool) -> Line<'static> {
    let marker = if focused { "> " } else { "  " };
    let mut style = if focused {
        Style::default().add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    if warning {
        style = style.fg(Color::Red);
    }
    Line::styled(format!("{}{} {}", marker, label, value), style)
}

fn render_add_pet_popup(f: &mut Frame, app: &App) {
    let Some(form) = app.pets.add_dialog.form() else {
        return;
    };

    let popup_area = centered_popup(f.area(), 44, 11);
    f.render_widget(Clear, popup_area);

    let type_value = form
        .pet_type
        .as_ref()
        .map(|t| t.name.clone())
        .unwrap_or_else(|| "(choose)".to_string());
    let owner_flag = if form.has_owner { "[x]" } else { "[ ]" };

    let focus = app.add_pet_focus;
    let mut lines = vec![
        field_line("Name: ", form.pet_name.clone(), focus == AddPetField::Name, form.pet_name_warning),
        field_line("Age:  ", form.age_text(), focus == AddPetField::Age, form.pet_age_warning),
        field_line("Type: ", type_value, focus == AddPetField::Type, form.pet_type_warning),
        field_line("Has owner ", owner_flag.to_string(), focus == AddPetField::HasOwner, false),
    ];
    if form.has_owner {
        lines.push(field_line(
            "Owner:",
            form.owner_name.clone(),
            focus == AddPetField::OwnerName,
            form.owner_name_warning,
        ));
    }
    if form.has_warning() {
        lines.push(Line::raw(""));
        lines.push(Line::styled(
            "Fill in the highlighted fields",
            Style::default().fg(Color::Red),
        ));
    }

    let popup = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Add Pet (Enter: register, Esc: cancel)")
            .style(Style::default().fg(Color::Green)),
    );
    f.render_widget(popup, popup_area);

    if form.type_dropdown_expanded {
        render_type_dropdown(f, app, popup_area);
    }
}

fn render_type_dropdown(f: &mut Frame, app: &App, anchor: Rect) {
    let height = app.pets.pet_types.len() as u16 + 2;
    let dropdown_area = Rect {
        x: anchor.x + 10,
        y: anchor.y + 3,
        width: 16.min(f.area().width),
        height: height.min(f.area().height),
    };
    f.render_widget(Clear, dropdown_area);

    let items: Vec<ListItem> = app
        .pets
        .pet_types
        .iter()
        .enumerate()
        .map(|(i, pet_type)| {
            let style = if i == app.type_menu_index {
                Style::default().bg(Color::Blue).fg(Color::White)
            } else {
                Style::default()
            };
            ListItem::new(pet_type.name.clone()).style(style)
        })
        .collect();

    let list = List::new(items).block(Block::default().borders(Borders::ALL).title("Type"));
    f.render_widget(list, dropdown_area);
}

fn render_confirm_popup(f: &mut Frame, question: &str) {
    let width = (question.len() as u16 + 4).max(30);
    let popup_area = centered_popup(f.area(), width, 5);
    f.render_widget(Clear, popup_area);

    let popup = Paragraph::new(vec![
        Line::raw(question.to_string()),
        Line::raw(""),
        Line::styled(
            "Enter/y: confirm   Esc/n: cancel",
            Style::default().fg(Color::DarkGray),
        ),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title("Confirm")
            .style(Style::default().fg(Color::Red)),
    );
    f.render_widget(popup, popup_area);
}

fn render_edit_owner_popup(f: &mut Frame, app: &App) {
    let Some(name) = app.owners.edit_dialog.provisional_name() else {
        return;
    };

    let popup_area = centered_popup(f.area(), 40, 5);
    f.render_widget(Clear, popup_area);

    let popup = Paragraph::new(vec![
        Line::raw(format!("Name: {}", name)),
        Line::raw(""),
        Line::styled(
            "Enter: save   Esc: cancel",
            Style::default().fg(Color::DarkGray),
        ),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title("Edit Owner")
            .style(Style::default().fg(Color::Yellow)),
    );
    f.render_widget(popup, popup_area);
}

fn render_help_popup(f: &mut Frame, scroll: usize) {
    let area = f.area();
    let popup_area = Rect {
        x: area.width / 10,
        y: area.height / 10,
        width: area.width * 4 / 5,
        height: area.height * 4 / 5,
    };

    f.render_widget(Clear, popup_area);

    let help_text = get_help_text();
    let help_lines: Vec<&str> = help_text.lines().collect();
    let visible_height = popup_area.height.saturating_sub(2) as usize;

    let start_line = scroll.min(help_lines.len().saturating_sub(visible_height));
    let end_line = (start_line + visible_height).min(help_lines.len());

    let visible_text = help_lines[start_line..end_line].join("\n");

    let help_widget = Paragraph::new(visible_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(
                    "petbook Help (Line {}/{})",
                    start_line + 1,
                    help_lines.len()
                ))
                .style(Style::default().fg(Color::Cyan)),
        )
        .style(Style::default().fg(Color::White));

    f.render_widget(help_widget, popup_area);
}

fn get_help_text() -> String {
    r#"PETBOOK KEYBOARD REFERENCE

=== SCREENS ===
1               Pets screen
2               Owners screen
Tab             Toggle between screens

=== PETS SCREEN ===
↑↓ or j/k       Move the selection
a               Add a pet (opens the registration form)
d or Delete     Unregister the selected pet (asks for confirmation)
/               Search pets by name (filters as you type)
Esc             Clear an applied search filter

=== ADD PET FORM ===
Tab/↓           Next field
Shift+Tab/↑     Previous field
Enter           On the Type field: open the type list
                Elsewhere: register the pet
Space           On "Has owner": toggle; the owner-name field
                appears only while it is ticked
Esc             Cancel without registering

Name, age, and type are required. A ticked "Has owner" also
requires an owner name; the named owner is reused when one
with that name already exists, otherwise they are registered
too. Missing fields are highlighted in red and nothing is
saved until they are filled in.

=== OWNERS SCREEN ===
↑↓ or j/k       Move the selection
Enter           Expand/collapse the owner's pet list
e               Edit the selected owner's name
d or Delete     Unregister the selected owner (only possible
                once they have no pets)
/               Search owners by name

=== CSV EXPORT ===
Ctrl+E          Export the active screen's list to CSV
                (pets.csv or owners.csv by default; type a
                different filename before pressing Enter)
                The export reflects the current search filter.

=== PERSISTENCE ===
Every change is saved to the registry file in the background
as soon as it is made; there is no save key. A "Save failed"
message in the status bar means the last write did not reach
disk.

=== HELP NAVIGATION ===
↑↓ or j/k       Scroll help text up/down one line
Page Up/Down    Scroll help text up/down 5 lines
Home            Jump to top of help text
Esc/F1/?/q      Close this help window"#
        .to_string()
}
