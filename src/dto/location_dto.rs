use serde::{Deserialize, Serialize};

use crate::models::location::{AddressHierarchy, City, Neighborhood, State};
use crate::models::person::{PersonKind, PersonRef};
use crate::services::address_resolver::AddressQuery;

// Request para registrar la localización de una persona
#[derive(Debug, Deserialize)]
pub struct RegisterLocationRequest {
    pub cliente: bool,
    pub usuario_id: i64,
    #[serde(flatten)]
    pub address: AddressQuery,
}

impl RegisterLocationRequest {
    pub fn person(&self) -> PersonRef {
        PersonRef {
            kind: PersonKind::from_is_customer(self.cliente),
            id: self.usuario_id,
        }
    }
}

// Response de cidade con su UF
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CityDetail {
    pub id: i64,
    pub nome: String,
    pub uf: State,
}

impl CityDetail {
    pub fn new(city: &City, state: &State) -> Self {
        Self {
            id: city.id,
            nome: city.name.clone(),
            uf: state.clone(),
        }
    }
}

// Response de bairro con cidade y UF
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NeighborhoodDetail {
    pub id: i64,
    pub nome: String,
    pub cidade: CityDetail,
}

impl NeighborhoodDetail {
    pub fn new(neighborhood: &Neighborhood, city: CityDetail) -> Self {
        Self {
            id: neighborhood.id,
            nome: neighborhood.name.clone(),
            cidade: city,
        }
    }
}

// Response de endereço con toda la jerarquía
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddressDetail {
    pub id: i64,
    pub cep: String,
    pub logradouro: String,
    pub numero: i32,
    pub complemento: String,
    pub bairro: NeighborhoodDetail,
}

impl From<AddressHierarchy> for AddressDetail {
    fn from(row: AddressHierarchy) -> Self {
        Self {
            id: row.id,
            cep: row.postal_code,
            logradouro: row.street,
            numero: row.number,
            complemento: row.complement,
            bairro: NeighborhoodDetail {
                id: row.neighborhood_id,
                nome: row.neighborhood_name,
                cidade: CityDetail {
                    id: row.city_id,
                    nome: row.city_name,
                    uf: State {
                        id: row.state_id,
                        abbreviation: row.state_abbreviation,
                    },
                },
            },
        }
    }
}

// Response de registrar/localizacao: persona y endereço vinculado
#[derive(Debug, Serialize)]
pub struct RegisteredLocationResponse {
    pub cliente: bool,
    pub usuario_id: i64,
    pub endereco: AddressDetail,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults_complement() {
        let request: RegisterLocationRequest = serde_json::from_str(
            r#"{"cliente": false, "usuario_id": 7, "uf": "SP", "cidade": "Campinas", "bairro": "Centro",
                "logradouro": "Rua X", "numero": 10, "cep": "13010-000"}"#,
        )
        .unwrap();
        let person = request.person();

        assert_eq!(person.kind, PersonKind::Employee);
        assert_eq!(person.id, 7);
        assert_eq!(request.address.complement, "");
        assert_eq!(request.address.city_name, "Campinas");
    }

    #[test]
    fn test_address_detail_nests_hierarchy() {
        let detail = AddressDetail::from(AddressHierarchy {
            id: 4,
            postal_code: "01000-000".into(),
            street: "Rua X".into(),
            number: 10,
            complement: String::new(),
            neighborhood_id: 3,
            neighborhood_name: "Centro".into(),
            city_id: 2,
            city_name: "São Paulo".into(),
            state_id: 1,
            state_abbreviation: "SP".into(),
        });
        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["bairro"]["cidade"]["uf"]["sigla"], "SP");
        assert_eq!(json["bairro"]["cidade"]["nome"], "São Paulo");
        assert_eq!(json["logradouro"], "Rua X");
    }
}
