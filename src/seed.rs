//! Sample donor postings for local runs.

use tracing::info;

use crate::engine::registrations::register_donation;
use crate::error::AppError;
use crate::models::donation::NewDonation;
use crate::state::AppState;

fn posting(
    org_name: &str,
    contact_person: &str,
    donor_email: &str,
    donor_phone: &str,
    food_type: &str,
    pickup_time: &str,
    address: &str,
) -> NewDonation {
    NewDonation {
        org_name: org_name.to_string(),
        contact_person: contact_person.to_string(),
        donor_email: donor_email.to_string(),
        donor_phone: donor_phone.to_string(),
        food_type: food_type.to_string(),
        pickup_time: pickup_time.to_string(),
        address: address.to_string(),
        owner_email: None,
    }
}

pub fn sample_donations() -> Vec<NewDonation> {
    vec![
        posting(
            "Panadería La Esperanza",
            "Juan Pérez",
            "juan@esperanza.com",
            "5512345678",
            "Pan dulce y bolillos del día",
            "Lunes a Viernes, 8pm",
            "Av. Vallarta 2440, Arcos Vallarta, Guadalajara, Jal.",
        ),
        posting(
            "Mercado de Abastos",
            "María González",
            "maria@abastos.com",
            "3312345678",
            "Frutas y verduras de temporada",
            "Martes y Jueves, 7am",
            "Av. Mandarina, Comercial Abastos, Guadalajara, Jal.",
        ),
        posting(
            "Restaurante Casa Bariachi",
            "Carlos Ruiz",
            "carlos@bariachi.com",
            "3398765432",
            "Guisados y arroz",
            "Domingos, 10pm",
            "Av. Vallarta 2221, Arcos Vallarta, Guadalajara, Jal.",
        ),
        posting(
            "Supermercado Fresko",
            "Ana López",
            "ana@fresko.com",
            "3311223344",
            "Lácteos y embutidos",
            "Lunes, 9am",
            "Av. Rafael Sanzio 150, La Estancia, Zapopan, Jal.",
        ),
    ]
}

pub async fn seed_sample_donations(state: &AppState) -> Result<usize, AppError> {
    let samples = sample_donations();
    let count = samples.len();
    for donation in samples {
        register_donation(state, donation).await?;
    }

    info!(count, "sample donations inserted");
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn seeds_four_unclaimed_postings() {
        let state = AppState::new(16);
        assert_eq!(seed_sample_donations(&state).await.unwrap(), 4);

        let donations = state.donations.list().await.unwrap();
        assert_eq!(donations.len(), 4);
        assert!(donations
            .iter()
            .all(|donation| donation.assigned_volunteers.is_empty()));
    }
}
