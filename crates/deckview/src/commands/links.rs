use colored::Colorize;

use crate::cli::LinkCommands;
use crate::image_links::ImageLink;

pub fn run(command: LinkCommands) -> anyhow::Result<()> {
    let mut state = super::open_state()?;
    match command {
        LinkCommands::List => {
            print_links(state.ensure_image_links()?);
        }
        LinkCommands::Add => {
            state.ensure_image_links()?;
            let id = state.add_image_link()?;
            println!("{} {}", "Added".green().bold(), id.cyan());
        }
        LinkCommands::Set { id, field, value } => {
            state.update_image_link(&id, field, &value)?;
            println!("{} {id} {field:?}", "Updated".green().bold());
        }
        LinkCommands::Delete { id } => {
            state.delete_image_link(&id)?;
            println!("{} {id}", "Deleted".green().bold());
        }
        LinkCommands::Apply => {
            state.ensure_image_links()?;
            let applied = state.apply_image_links()?;
            println!(
                "{} {applied} of {} slides now use linked images",
                "Applied".green().bold(),
                state.presentation().slide_count()
            );
        }
    }
    Ok(())
}

fn print_links(links: &[ImageLink]) {
    if links.is_empty() {
        println!("{}", "No image links".dimmed());
        return;
    }
    for link in links {
        println!("{} {}", format!("#{:<3}", link.slide_number).bold(), link.id.cyan());
        println!("     url       {}", link.url);
        match link.fallback_url.as_deref().filter(|f| !f.is_empty()) {
            Some(fallback) => println!("     fallback  {}", fallback.dimmed()),
            None => println!("     fallback  {}", "(none)".dimmed()),
        }
    }
}
